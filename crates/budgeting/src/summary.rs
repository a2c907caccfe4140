use crate::models::{Budget, BudgetStatus, BudgetSummary, Cents, Transaction, TransactionType};
use crate::period::BudgetPeriod;
use chrono::NaiveDate;
use common::format::CurrencyFormat;

/// Spending above this share of the budget turns the status to warning.
pub const WARNING_THRESHOLD: f64 = 80.0;
/// Spending above this share of the budget turns the status to danger.
pub const DANGER_THRESHOLD: f64 = 100.0;

pub struct BudgetSummaryCalculator;

impl BudgetSummaryCalculator {
    /// Summarises one month of spending against the budgets passed in.
    ///
    /// `budgets` are summed as given: the caller has already narrowed them to
    /// the user and period. `transactions` may span any range; only expenses
    /// dated inside the month count. `today` drives the days-left figure.
    ///
    /// An invalid `month` yields a summary with nothing spent and no days left.
    pub fn compute_budget_summary(
        budgets: &[Budget],
        transactions: &[Transaction],
        month: u32,
        year: i32,
        today: NaiveDate,
    ) -> BudgetSummary {
        match BudgetPeriod::new(year, month) {
            Ok(period) => Self::compute_for_period(budgets, transactions, period, today),
            Err(e) => {
                tracing::warn!("Cannot derive budget period: {}", e);
                let total_budget = total_budget(budgets);
                summarize(total_budget, 0, 0)
            }
        }
    }

    pub fn compute_for_period(
        budgets: &[Budget],
        transactions: &[Transaction],
        period: BudgetPeriod,
        today: NaiveDate,
    ) -> BudgetSummary {
        let total_budget = total_budget(budgets);
        let total_spent: Cents = transactions
            .iter()
            .filter(|t| t.kind == TransactionType::Expense && period.contains(t.transaction_date))
            .fold(0, |acc: Cents, t| acc.saturating_add(t.amount));

        summarize(total_budget, total_spent, period.days_left(today))
    }
}

fn total_budget(budgets: &[Budget]) -> Cents {
    budgets.iter().fold(0, |acc: Cents, b| acc.saturating_add(b.amount))
}

fn summarize(total_budget: Cents, total_spent: Cents, days_left: u32) -> BudgetSummary {
    let remaining = total_budget - total_spent;

    let daily_allowance = if days_left > 0 && remaining > 0 {
        per_day(remaining, Cents::from(days_left))
    } else {
        0
    };

    let percentage = if total_budget > 0 {
        total_spent as f64 * 100.0 / total_budget as f64
    } else {
        0.0
    };

    BudgetSummary {
        total_budget,
        total_spent,
        remaining,
        days_left,
        daily_allowance,
        percentage,
        status: status_for(percentage),
    }
}

/// `amount / days` to the nearest cent, halves rounded up. Both inputs positive.
fn per_day(amount: Cents, days: Cents) -> Cents {
    let (whole, rest) = (amount / days, amount % days);
    if rest >= days - rest { whole + 1 } else { whole }
}

pub fn status_for(percentage: f64) -> BudgetStatus {
    if percentage > DANGER_THRESHOLD {
        BudgetStatus::Danger
    } else if percentage > WARNING_THRESHOLD {
        BudgetStatus::Warning
    } else {
        BudgetStatus::Safe
    }
}

/// Free-function form of [`BudgetSummaryCalculator::compute_budget_summary`].
pub fn compute_budget_summary(
    budgets: &[Budget],
    transactions: &[Transaction],
    month: u32,
    year: i32,
    today: NaiveDate,
) -> BudgetSummary {
    BudgetSummaryCalculator::compute_budget_summary(budgets, transactions, month, year, today)
}

/// One-line guidance shown under the budget gauge.
pub fn advisory_message(summary: &BudgetSummary, currency: &CurrencyFormat) -> String {
    match summary.status {
        BudgetStatus::Danger => format!(
            "You've exceeded your budget by {}.",
            currency.format(summary.total_spent - summary.total_budget)
        ),
        BudgetStatus::Warning => format!(
            "Careful: only {} left for {}.",
            currency.format(summary.remaining),
            day_count(summary.days_left)
        ),
        BudgetStatus::Safe if summary.days_left > 0 => format!(
            "You can spend {} per day for the next {}.",
            currency.format(summary.daily_allowance),
            day_count(summary.days_left)
        ),
        BudgetStatus::Safe => "This budget period has ended.".to_string(),
    }
}

fn day_count(days: u32) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", days)
    }
}
