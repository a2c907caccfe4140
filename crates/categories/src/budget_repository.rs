use crate::models::{CreateMonthlyBudgetRequest, MonthlyBudget};
use budgeting::BudgetPeriod;
use database::{self, RepositoryError};
use sqlx::FromRow;

#[derive(FromRow)]
struct MonthlyBudgetRecord {
    id: i64,
    user_id: String,
    month: u32,
    year: i32,
    category_id: Option<i64>,
    amount: i64,
}

impl From<MonthlyBudgetRecord> for MonthlyBudget {
    fn from(record: MonthlyBudgetRecord) -> Self {
        MonthlyBudget {
            id: record.id,
            user_id: record.user_id,
            month: record.month,
            year: record.year,
            category_id: record.category_id,
            amount: record.amount,
        }
    }
}

pub struct MonthlyBudgetRepository<'a> {
    conn: &'a mut database::Connection,
}

impl<'a> MonthlyBudgetRepository<'a> {
    pub fn new(conn: &'a mut database::Connection) -> Self {
        Self { conn }
    }

    /// One row per (user, month, year, category); a second write replaces the amount.
    pub async fn upsert(&mut self, req: &CreateMonthlyBudgetRequest) -> Result<i64, RepositoryError> {
        // `IS` so the whole-month row (NULL category) matches itself.
        let updated: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE monthly_budgets SET amount = $1
            WHERE user_id = $2 AND year = $3 AND month = $4 AND category_id IS $5
            RETURNING id
            "#,
        )
        .bind(req.amount)
        .bind(&req.user_id)
        .bind(req.year)
        .bind(req.month)
        .bind(req.category_id)
        .fetch_optional(&mut *self.conn)
        .await?;

        if let Some(id) = updated {
            return Ok(id);
        }

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO monthly_budgets (user_id, month, year, category_id, amount) VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(&req.user_id)
        .bind(req.month)
        .bind(req.year)
        .bind(req.category_id)
        .bind(req.amount)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(id)
    }

    pub async fn get_for_period(
        &mut self,
        user_id: &str,
        period: BudgetPeriod,
    ) -> Result<Vec<MonthlyBudget>, RepositoryError> {
        let records = sqlx::query_as::<_, MonthlyBudgetRecord>(
            "SELECT id, user_id, month, year, category_id, amount FROM monthly_budgets WHERE user_id = $1 AND year = $2 AND month = $3 ORDER BY id",
        )
        .bind(user_id)
        .bind(period.year())
        .bind(period.month())
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(records.into_iter().map(|r| r.into()).collect())
    }

    // "Auto-Copy" Logic
    // Copies limits from source to target ONLY if target has no entries.
    pub async fn copy_budgets(
        &mut self,
        user_id: &str,
        source: BudgetPeriod,
        target: BudgetPeriod,
    ) -> Result<u64, RepositoryError> {
        // 1. Check if target has data
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM monthly_budgets WHERE user_id = $1 AND year = $2 AND month = $3",
        )
        .bind(user_id)
        .bind(target.year())
        .bind(target.month())
        .fetch_one(&mut *self.conn)
        .await?;

        if count > 0 {
            return Ok(0); // Already exists, don't overwrite
        }

        // 2. Copy
        let result = sqlx::query(
            r#"
            INSERT INTO monthly_budgets (user_id, month, year, category_id, amount)
            SELECT user_id, $1, $2, category_id, amount FROM monthly_budgets
            WHERE user_id = $3 AND year = $4 AND month = $5
            "#,
        )
        .bind(target.month())
        .bind(target.year())
        .bind(user_id)
        .bind(source.year())
        .bind(source.month())
        .execute(&mut *self.conn)
        .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::get_test_db;

    fn period(y: i32, m: u32) -> BudgetPeriod {
        BudgetPeriod::new(y, m).unwrap()
    }

    fn request(user: &str, p: BudgetPeriod, category_id: Option<i64>, dollars: f64) -> CreateMonthlyBudgetRequest {
        CreateMonthlyBudgetRequest::new(user.to_string(), p, category_id, dollars).unwrap()
    }

    async fn setup_category(conn: &mut database::Connection, user: &str) -> i64 {
        sqlx::query_scalar(
            "INSERT INTO categories (user_id, name, color, type) VALUES ($1, 'Food', '#000', 'expense') RETURNING id",
        )
        .bind(user)
        .fetch_one(&mut *conn)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_upsert_replaces_amount() {
        let db = get_test_db().await;
        let mut uow = db.begin().await.unwrap();
        let mut repo = MonthlyBudgetRepository::new(uow.connection());

        let first = repo.upsert(&request("u1", period(2026, 10), None, 500.0)).await.unwrap();
        let second = repo.upsert(&request("u1", period(2026, 10), None, 750.0)).await.unwrap();
        assert_eq!(first, second);

        let rows = repo.get_for_period("u1", period(2026, 10)).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, 75_000);
    }

    #[tokio::test]
    async fn test_total_and_category_rows_coexist() {
        let db = get_test_db().await;
        let mut uow = db.begin().await.unwrap();
        let food = setup_category(uow.connection(), "u1").await;
        let mut repo = MonthlyBudgetRepository::new(uow.connection());

        repo.upsert(&request("u1", period(2026, 10), None, 1000.0)).await.unwrap();
        repo.upsert(&request("u1", period(2026, 10), Some(food), 200.0)).await.unwrap();
        repo.upsert(&request("u1", period(2026, 10), Some(food), 250.0)).await.unwrap();
        repo.upsert(&request("u2", period(2026, 10), None, 50.0)).await.unwrap();
        repo.upsert(&request("u1", period(2026, 11), None, 50.0)).await.unwrap();

        let rows = repo.get_for_period("u1", period(2026, 10)).await.unwrap();
        let amounts: Vec<(Option<i64>, i64)> = rows.iter().map(|b| (b.category_id, b.amount)).collect();
        assert_eq!(amounts, vec![(None, 100_000), (Some(food), 25_000)]);
    }

    #[tokio::test]
    async fn test_copy_budgets_only_into_empty_month() {
        let db = get_test_db().await;
        let mut uow = db.begin().await.unwrap();
        let food = setup_category(uow.connection(), "u1").await;
        let mut repo = MonthlyBudgetRepository::new(uow.connection());

        repo.upsert(&request("u1", period(2026, 9), None, 1000.0)).await.unwrap();
        repo.upsert(&request("u1", period(2026, 9), Some(food), 200.0)).await.unwrap();
        repo.upsert(&request("u2", period(2026, 9), None, 10.0)).await.unwrap();

        assert_eq!(repo.copy_budgets("u1", period(2026, 9), period(2026, 10)).await.unwrap(), 2);
        assert_eq!(repo.copy_budgets("u1", period(2026, 9), period(2026, 10)).await.unwrap(), 0);

        let copied = repo.get_for_period("u1", period(2026, 10)).await.unwrap();
        assert_eq!(copied.iter().map(|b| b.amount).sum::<i64>(), 120_000);
        assert!(copied.iter().all(|b| b.month == 10 && b.year == 2026 && b.user_id == "u1"));
    }
}
