//! Budget status and category insights derived from raw transaction and
//! budget records.
//!
//! Everything in this crate is a pure function of its inputs. Callers fetch
//! records, pick the reference date, and render the results.

pub mod insights;
pub mod models;
pub mod period;
pub mod refresh;
pub mod summary;
pub mod window;

pub use insights::{InsightsAggregator, aggregate_by_category};
pub use models::{
    Budget, BudgetStatus, BudgetSummary, CategoryBreakdown, CategoryInfo, CategoryInsight,
    CategoryRef, Cents, MAX_AMOUNT, Transaction, TransactionType, cents_from_major,
};
pub use period::{BudgetPeriod, PeriodError};
pub use refresh::{RecordChange, SummaryCache};
pub use summary::{BudgetSummaryCalculator, advisory_message, compute_budget_summary};
pub use window::TimeWindow;
