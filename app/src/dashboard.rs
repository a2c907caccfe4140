use budgeting::{BudgetPeriod, BudgetSummary, RecordChange, SummaryCache, TransactionType};
use categories::service::{CategoryError, CategoryService};
use chrono::{NaiveDate, NaiveDateTime};
use database::Database;
use transactions::service::{TransactionError, TransactionService};

/// Page-level controller: reads go through the summary cache, writes emit
/// the change event that invalidates it.
pub struct Dashboard<'a> {
    db: &'a Database,
    user_id: String,
    cache: SummaryCache,
}

impl<'a> Dashboard<'a> {
    pub fn new(db: &'a Database, user_id: impl Into<String>) -> Self {
        Self {
            db,
            user_id: user_id.into(),
            cache: SummaryCache::new(),
        }
    }

    pub async fn summary(&mut self, period: BudgetPeriod, today: NaiveDate) -> Result<BudgetSummary, TransactionError> {
        if let Some(hit) = self.cache.get(period, today) {
            return Ok(hit.clone());
        }
        let summary = TransactionService::budget_summary(self.db, &self.user_id, period, today).await?;
        self.cache.insert(period, today, summary.clone());
        Ok(summary)
    }

    pub async fn record_transaction(
        &mut self,
        category_id: Option<i64>,
        kind: TransactionType,
        date: NaiveDateTime,
        amount_dollars: f64,
        notes: Option<String>,
    ) -> Result<i64, TransactionError> {
        let id = TransactionService::create_transaction(
            self.db,
            &self.user_id,
            category_id,
            kind,
            date,
            amount_dollars,
            notes,
        )
        .await?;
        self.cache.apply(RecordChange::Transactions);
        Ok(id)
    }

    pub async fn delete_transaction(&mut self, id: i64) -> Result<(), TransactionError> {
        TransactionService::delete_transaction(self.db, &self.user_id, id).await?;
        self.cache.apply(RecordChange::Transactions);
        Ok(())
    }

    pub async fn set_budget(
        &mut self,
        period: BudgetPeriod,
        category_id: Option<i64>,
        limit_dollars: f64,
    ) -> Result<i64, CategoryError> {
        let id = CategoryService::set_budget(self.db, &self.user_id, period, category_id, limit_dollars).await?;
        self.cache.apply(RecordChange::Budgets);
        Ok(id)
    }

    pub async fn add_category(
        &mut self,
        name: String,
        kind: TransactionType,
        color: Option<String>,
        icon: Option<String>,
    ) -> Result<i64, CategoryError> {
        let id = CategoryService::create_category(self.db, &self.user_id, name, kind, color, icon).await?;
        self.cache.apply(RecordChange::Categories);
        Ok(id)
    }

    /// Carries last month's limits forward so a new month starts budgeted.
    pub async fn prepare_period(&mut self, period: BudgetPeriod) -> Result<(), CategoryError> {
        if CategoryService::ensure_budgets_exist(self.db, &self.user_id, period).await? > 0 {
            self.cache.apply(RecordChange::Budgets);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::get_test_db;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 22).unwrap()
    }

    #[tokio::test]
    async fn test_new_transaction_refreshes_summary() {
        let db = get_test_db().await;
        let mut dashboard = Dashboard::new(&db, "u1");
        let period = BudgetPeriod::new(2026, 10).unwrap();
        dashboard.set_budget(period, None, 1_000.0).await.unwrap();

        let before = dashboard.summary(period, today()).await.unwrap();
        assert_eq!(before.total_spent, 0);

        let at = today().and_hms_opt(8, 0, 0).unwrap();
        let id = dashboard
            .record_transaction(None, TransactionType::Expense, at, 250.0, None)
            .await
            .unwrap();

        let after = dashboard.summary(period, today()).await.unwrap();
        assert_eq!(after.total_spent, 25_000);
        assert_eq!(after.remaining, 75_000);

        dashboard.delete_transaction(id).await.unwrap();
        assert_eq!(dashboard.summary(period, today()).await.unwrap().total_spent, 0);
    }

    #[tokio::test]
    async fn test_summary_follows_the_reference_date() {
        let db = get_test_db().await;
        let mut dashboard = Dashboard::new(&db, "u1");
        let period = BudgetPeriod::new(2026, 10).unwrap();
        dashboard.set_budget(period, None, 310.0).await.unwrap();

        let first = dashboard.summary(period, NaiveDate::from_ymd_opt(2026, 10, 1).unwrap()).await.unwrap();
        assert_eq!(first.days_left, 31);
        assert_eq!(first.daily_allowance, 1_000);

        let later = dashboard.summary(period, NaiveDate::from_ymd_opt(2026, 10, 22).unwrap()).await.unwrap();
        assert_eq!(later.days_left, 10);
        assert_eq!(later.daily_allowance, 3_100);
    }

    #[tokio::test]
    async fn test_prepare_period_copies_previous_limits() {
        let db = get_test_db().await;
        let mut dashboard = Dashboard::new(&db, "u1");
        let september = BudgetPeriod::new(2026, 9).unwrap();
        let october = september.next();
        dashboard.set_budget(september, None, 500.0).await.unwrap();

        let empty = dashboard.summary(october, today()).await.unwrap();
        assert_eq!(empty.total_budget, 0);

        dashboard.prepare_period(october).await.unwrap();
        assert_eq!(dashboard.summary(october, today()).await.unwrap().total_budget, 50_000);
    }
}
