//! Recompute-on-change for budget summaries.
//!
//! Storage pushes a [`RecordChange`] whenever rows move; the cache drops what
//! that change could affect and the next read recomputes it.

use crate::models::BudgetSummary;
use crate::period::BudgetPeriod;
use chrono::NaiveDate;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordChange {
    Transactions,
    Budgets,
    Categories,
}

impl RecordChange {
    fn affects_summaries(&self) -> bool {
        match self {
            RecordChange::Transactions | RecordChange::Budgets => true,
            // Summaries carry no category display data.
            RecordChange::Categories => false,
        }
    }
}

/// Last computed summary per period and reference date. Days left and the
/// daily allowance move with `today`, so a new date is a miss.
#[derive(Debug, Default)]
pub struct SummaryCache {
    entries: HashMap<(BudgetPeriod, NaiveDate), BudgetSummary>,
}

impl SummaryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, change: RecordChange) {
        if change.affects_summaries() && !self.entries.is_empty() {
            tracing::debug!(?change, dropped = self.entries.len(), "Invalidating budget summaries");
            self.entries.clear();
        }
    }

    pub fn get(&self, period: BudgetPeriod, today: NaiveDate) -> Option<&BudgetSummary> {
        self.entries.get(&(period, today))
    }

    pub fn insert(&mut self, period: BudgetPeriod, today: NaiveDate, summary: BudgetSummary) {
        // Entries for earlier dates can never be read again once the clock moves on.
        self.entries.retain(|(p, day), _| *p != period || *day >= today);
        self.entries.insert((period, today), summary);
    }
}
