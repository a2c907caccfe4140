use crate::models::{CreateTransactionRequest, MonthlySummary, TransactionRecord};
use crate::repository::TransactionRepository;
use budgeting::{
    Budget, BudgetPeriod, BudgetSummary, BudgetSummaryCalculator, CategoryBreakdown, Cents, InsightsAggregator,
    Transaction, TransactionType,
};
use categories::budget_repository::MonthlyBudgetRepository;
use categories::service::{CategoryError, CategoryService};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use database::{Database, RepositoryError};
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Database error: {0}")]
    Infrastructure(String),
    #[error("Transaction not found")]
    NotFound,
}

impl From<RepositoryError> for TransactionError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => TransactionError::NotFound,
            RepositoryError::CheckViolation(msg) | RepositoryError::ForeignKeyViolation(msg) => {
                TransactionError::InvalidInput(msg)
            }
            _ => TransactionError::Infrastructure(err.to_string()),
        }
    }
}

impl From<CategoryError> for TransactionError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::InvalidInput(msg) | CategoryError::Conflict(msg) => TransactionError::InvalidInput(msg),
            CategoryError::NotFound => TransactionError::InvalidInput("Invalid category ID".into()),
            CategoryError::Infrastructure(msg) => TransactionError::Infrastructure(msg),
        }
    }
}

pub struct TransactionService;

impl TransactionService {
    #[instrument(skip(db))]
    pub async fn create_transaction(
        db: &Database,
        user_id: &str,
        category_id: Option<i64>,
        kind: TransactionType,
        date: NaiveDateTime,
        amount_dollars: f64,
        notes: Option<String>,
    ) -> Result<i64, TransactionError> {
        // The category decides which side of the ledger the row lands on.
        if let Some(id) = category_id {
            let category = CategoryService::get_category(db, user_id, id).await.map_err(|e| {
                tracing::error!("Failed to get category for transaction: {:?}", e);
                TransactionError::from(e)
            })?;
            if category.kind != kind {
                return Err(TransactionError::InvalidInput(format!(
                    "'{}' is an {} category, not {}",
                    category.name, category.kind, kind
                )));
            }
        }

        let req = CreateTransactionRequest::new(user_id.to_string(), category_id, kind, date, amount_dollars, notes)
            .map_err(TransactionError::InvalidInput)?;

        let mut uow = db.begin().await?;
        let id = TransactionRepository::new(uow.connection()).create(&req).await?;
        uow.commit().await?;

        tracing::info!(id, amount = req.amount(), "Recorded {}", req.kind());
        Ok(id)
    }

    #[instrument(skip(db))]
    pub async fn delete_transaction(db: &Database, user_id: &str, id: i64) -> Result<(), TransactionError> {
        let mut uow = db.begin().await?;
        TransactionRepository::new(uow.connection()).delete(user_id, id).await?;
        uow.commit().await?;
        Ok(())
    }

    /// The month's transactions, newest first, with income and expense totals.
    #[instrument(skip(db))]
    pub async fn get_month_view(
        db: &Database,
        user_id: &str,
        period: BudgetPeriod,
    ) -> Result<(Vec<TransactionRecord>, MonthlySummary), TransactionError> {
        let (start, end) = period_bounds(period);
        let mut uow = db.begin().await?;
        let transactions = TransactionRepository::new(uow.connection())
            .list_between(user_id, start, end)
            .await?;

        let summary = MonthlySummary::from_records(period, &transactions);
        Ok((transactions, summary))
    }

    /// Transactions of `user_id` in `[start, end]` with their category display data.
    #[instrument(skip(db))]
    pub async fn list_joined(
        db: &Database,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Transaction>, TransactionError> {
        let mut uow = db.begin().await?;
        let records = TransactionRepository::new(uow.connection())
            .list_between(user_id, start, end)
            .await?;
        Ok(records.iter().map(Transaction::from).collect())
    }

    #[instrument(skip(db))]
    pub async fn budget_summary(
        db: &Database,
        user_id: &str,
        period: BudgetPeriod,
        today: NaiveDate,
    ) -> Result<BudgetSummary, TransactionError> {
        let (start, end) = period_bounds(period);

        // Budgets and transactions come from one snapshot.
        let mut uow = db.begin().await?;
        let budgets: Vec<Budget> = MonthlyBudgetRepository::new(uow.connection())
            .get_for_period(user_id, period)
            .await?
            .into_iter()
            .map(Budget::from)
            .collect();
        let records = TransactionRepository::new(uow.connection())
            .list_between(user_id, start, end)
            .await?;
        let transactions: Vec<Transaction> = records.iter().map(Transaction::from).collect();

        let summary = BudgetSummaryCalculator::compute_for_period(&budgets, &transactions, period, today);
        tracing::debug!(
            %period,
            spent = summary.total_spent,
            status = %summary.status,
            "Computed budget summary"
        );
        Ok(summary)
    }

    #[instrument(skip(db))]
    pub async fn category_insights(
        db: &Database,
        user_id: &str,
        kind: TransactionType,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<CategoryBreakdown, TransactionError> {
        let transactions = Self::list_joined(db, user_id, start, end).await?;
        Ok(InsightsAggregator::aggregate_by_category(&transactions, kind, start, end))
    }

    #[instrument(skip(db))]
    pub async fn daily_totals(
        db: &Database,
        user_id: &str,
        kind: TransactionType,
        period: BudgetPeriod,
    ) -> Result<Vec<(NaiveDate, Cents)>, TransactionError> {
        let (start, end) = period_bounds(period);
        let transactions = Self::list_joined(db, user_id, start, end).await?;
        Ok(InsightsAggregator::daily_totals(&transactions, kind, period))
    }
}

fn period_bounds(period: BudgetPeriod) -> (NaiveDateTime, NaiveDateTime) {
    let end_of_day = NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap_or(NaiveTime::MIN);
    (
        period.first_day().and_time(NaiveTime::MIN),
        period.last_day().and_time(end_of_day),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use budgeting::{BudgetStatus, CategoryRef};
    use database::get_test_db;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(18, 30, 0).unwrap()
    }

    async fn seed(db: &Database) -> (i64, i64) {
        let food = CategoryService::create_category(db, "u1", "Food".into(), TransactionType::Expense, None, None)
            .await
            .unwrap();
        let salary = CategoryService::create_category(db, "u1", "Salary".into(), TransactionType::Income, None, None)
            .await
            .unwrap();
        (food, salary)
    }

    async fn record(db: &Database, user: &str, category: Option<i64>, kind: TransactionType, when: NaiveDateTime, dollars: f64) -> i64 {
        TransactionService::create_transaction(db, user, category, kind, when, dollars, None)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_rejects_mismatched_category() {
        let db = get_test_db().await;
        let (food, _) = seed(&db).await;

        let err = TransactionService::create_transaction(
            &db, "u1", Some(food), TransactionType::Income, at(2026, 10, 1), 10.0, None,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, TransactionError::InvalidInput(_)));

        let err = TransactionService::create_transaction(
            &db, "u1", Some(999), TransactionType::Expense, at(2026, 10, 1), 10.0, None,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, TransactionError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_month_view_totals() {
        let db = get_test_db().await;
        let (food, salary) = seed(&db).await;
        record(&db, "u1", Some(salary), TransactionType::Income, at(2026, 10, 1), 3000.0).await;
        record(&db, "u1", Some(food), TransactionType::Expense, at(2026, 10, 2), 45.5).await;
        record(&db, "u1", None, TransactionType::Expense, at(2026, 9, 30), 99.0).await;

        let period = BudgetPeriod::new(2026, 10).unwrap();
        let (rows, summary) = TransactionService::get_month_view(&db, "u1", period).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].category.name(), "Food");
        assert_eq!(summary.total_income, 300_000);
        assert_eq!(summary.total_expenses, 4_550);
        assert_eq!(summary.net, 295_450);
    }

    #[tokio::test]
    async fn test_budget_summary_end_to_end() {
        let db = get_test_db().await;
        let (food, salary) = seed(&db).await;
        let period = BudgetPeriod::new(2026, 10).unwrap();
        CategoryService::set_budget(&db, "u1", period, None, 10_000.0).await.unwrap();

        record(&db, "u1", Some(food), TransactionType::Expense, at(2026, 10, 3), 5_000.0).await;
        record(&db, "u1", None, TransactionType::Expense, at(2026, 10, 31), 3_500.0).await;
        record(&db, "u1", Some(salary), TransactionType::Income, at(2026, 10, 1), 9_000.0).await;
        record(&db, "u2", None, TransactionType::Expense, at(2026, 10, 4), 7_000.0).await;

        let today = NaiveDate::from_ymd_opt(2026, 10, 27).unwrap();
        let summary = TransactionService::budget_summary(&db, "u1", period, today).await.unwrap();
        assert_eq!(summary.total_spent, 850_000);
        assert_eq!(summary.percentage, 85.0);
        assert_eq!(summary.status, BudgetStatus::Warning);
        assert_eq!(summary.days_left, 5);
        assert_eq!(summary.daily_allowance, 30_000);
    }

    #[tokio::test]
    async fn test_category_insights_end_to_end() {
        let db = get_test_db().await;
        let (food, _) = seed(&db).await;
        record(&db, "u1", Some(food), TransactionType::Expense, at(2026, 10, 3), 15.0).await;
        record(&db, "u1", None, TransactionType::Expense, at(2026, 10, 4), 20.0).await;
        record(&db, "u1", Some(food), TransactionType::Expense, at(2026, 10, 5), 10.0).await;

        let breakdown = TransactionService::category_insights(
            &db, "u1", TransactionType::Expense, at(2026, 10, 1), at(2026, 10, 31),
        )
        .await
        .unwrap();

        let rows: Vec<(&str, Cents)> = breakdown.categories.iter().map(|c| (c.name(), c.total_amount)).collect();
        assert_eq!(rows, vec![("Food", 2_500), ("Uncategorized", 2_000)]);
        assert_eq!(breakdown.total, 4_500);
    }

    #[tokio::test]
    async fn test_list_joined_resolves_categories() {
        let db = get_test_db().await;
        let (food, _) = seed(&db).await;
        record(&db, "u1", Some(food), TransactionType::Expense, at(2026, 10, 3), 15.0).await;
        record(&db, "u1", None, TransactionType::Expense, at(2026, 10, 4), 20.0).await;

        let joined = TransactionService::list_joined(&db, "u1", at(2026, 10, 1), at(2026, 10, 31)).await.unwrap();
        assert_eq!(joined.len(), 2);
        assert_eq!(joined[0].category, CategoryRef::Uncategorized);
        assert_eq!(joined[1].category.id(), Some(food));
    }

    #[tokio::test]
    async fn test_daily_totals_end_to_end() {
        let db = get_test_db().await;
        record(&db, "u1", None, TransactionType::Expense, at(2026, 10, 3), 15.0).await;
        record(&db, "u1", None, TransactionType::Expense, at(2026, 10, 3), 5.0).await;

        let period = BudgetPeriod::new(2026, 10).unwrap();
        let days = TransactionService::daily_totals(&db, "u1", TransactionType::Expense, period).await.unwrap();
        assert_eq!(days.len(), 31);
        assert_eq!(days[2].1, 2_000);
    }

    #[tokio::test]
    async fn test_delete_transaction() {
        let db = get_test_db().await;
        let id = record(&db, "u1", None, TransactionType::Expense, at(2026, 10, 3), 15.0).await;

        let err = TransactionService::delete_transaction(&db, "u2", id).await.unwrap_err();
        assert!(matches!(err, TransactionError::NotFound));

        TransactionService::delete_transaction(&db, "u1", id).await.unwrap();
        let period = BudgetPeriod::new(2026, 10).unwrap();
        let (rows, _) = TransactionService::get_month_view(&db, "u1", period).await.unwrap();
        assert!(rows.is_empty());
    }
}
