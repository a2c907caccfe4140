use crate::models::{CategoryBreakdown, CategoryInsight, Cents, Transaction, TransactionType};
use crate::period::BudgetPeriod;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use std::collections::HashMap;

pub struct InsightsAggregator;

impl InsightsAggregator {
    /// Totals `kind` transactions inside `[start, end]` per category, largest first.
    ///
    /// Display data for each group comes from the first transaction seen in it.
    /// Equal totals keep the order in which their categories first appeared.
    pub fn aggregate_by_category(
        transactions: &[Transaction],
        kind: TransactionType,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> CategoryBreakdown {
        let mut slots: HashMap<Option<i64>, usize> = HashMap::new();
        let mut categories: Vec<CategoryInsight> = Vec::new();

        for t in transactions
            .iter()
            .filter(|t| t.kind == kind && t.transaction_date >= start && t.transaction_date <= end)
        {
            let key = t.category.id();
            match slots.get(&key) {
                Some(&idx) => categories[idx].total_amount += t.amount,
                None => {
                    slots.insert(key, categories.len());
                    categories.push(CategoryInsight {
                        category: t.category.clone(),
                        total_amount: t.amount,
                    });
                }
            }
        }

        // sort_by is stable
        categories.sort_by(|a, b| b.total_amount.cmp(&a.total_amount));
        let total = categories.iter().map(|c| c.total_amount).sum();

        CategoryBreakdown { categories, total }
    }

    /// One entry per calendar day of `period`, zero-filled, for calendar views.
    pub fn daily_totals(
        transactions: &[Transaction],
        kind: TransactionType,
        period: BudgetPeriod,
    ) -> Vec<(NaiveDate, Cents)> {
        let mut totals: Vec<(NaiveDate, Cents)> = period
            .first_day()
            .iter_days()
            .take(period.days_in_month() as usize)
            .map(|day| (day, 0))
            .collect();

        for t in transactions
            .iter()
            .filter(|t| t.kind == kind && period.contains(t.transaction_date))
        {
            let idx = (t.transaction_date.day() - 1) as usize;
            totals[idx].1 += t.amount;
        }

        totals
    }

    /// Per-month totals for `year`, January first.
    pub fn monthly_totals(
        transactions: &[Transaction],
        kind: TransactionType,
        year: i32,
    ) -> [Cents; 12] {
        let mut totals = [0; 12];
        for t in transactions
            .iter()
            .filter(|t| t.kind == kind && t.transaction_date.year() == year)
        {
            totals[t.transaction_date.month0() as usize] += t.amount;
        }
        totals
    }
}

/// Free-function form of [`InsightsAggregator::aggregate_by_category`].
pub fn aggregate_by_category(
    transactions: &[Transaction],
    kind: TransactionType,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> CategoryBreakdown {
    InsightsAggregator::aggregate_by_category(transactions, kind, start, end)
}
