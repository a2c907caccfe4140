use crate::models::{CreateTransactionRequest, TransactionRecord};
use budgeting::{CategoryInfo, CategoryRef};
use chrono::NaiveDateTime;
use database::{self, RepositoryError};
use sqlx::FromRow;

#[derive(FromRow)]
struct JoinedRecord {
    id: i64,
    user_id: String,
    category_id: Option<i64>,
    kind: String,
    transaction_date: NaiveDateTime,
    amount: i64,
    notes: Option<String>,
    category_name: Option<String>,
    category_color: Option<String>,
    category_icon: Option<String>,
}

impl TryFrom<JoinedRecord> for TransactionRecord {
    type Error = RepositoryError;

    fn try_from(record: JoinedRecord) -> Result<Self, Self::Error> {
        // No matching category row for this user reads as uncategorized.
        let category = match (record.category_id, record.category_name, record.category_color) {
            (Some(id), Some(name), Some(color)) => CategoryRef::Assigned(CategoryInfo {
                id,
                name,
                color,
                icon: record.category_icon,
            }),
            _ => CategoryRef::Uncategorized,
        };

        Ok(TransactionRecord {
            id: record.id,
            user_id: record.user_id,
            category,
            kind: record.kind.parse().map_err(RepositoryError::Corrupt)?,
            transaction_date: record.transaction_date,
            amount: record.amount,
            notes: record.notes,
        })
    }
}

pub(crate) struct TransactionRepository<'a> {
    conn: &'a mut database::Connection,
}

impl<'a> TransactionRepository<'a> {
    pub fn new(conn: &'a mut database::Connection) -> Self {
        Self { conn }
    }

    pub async fn create(&mut self, req: &CreateTransactionRequest) -> Result<i64, RepositoryError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO transactions (user_id, category_id, type, transaction_date, amount, notes) VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(req.user_id())
        .bind(req.category_id())
        .bind(req.kind().to_string())
        .bind(req.transaction_date())
        .bind(req.amount())
        .bind(req.notes())
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(id)
    }

    /// Transactions of `user_id` dated within `[start, end]`, newest first,
    /// joined to their category in the same statement.
    pub async fn list_between(
        &mut self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<TransactionRecord>, RepositoryError> {
        let records = sqlx::query_as::<_, JoinedRecord>(
            r#"
            SELECT t.id, t.user_id, t.category_id, t.type AS kind, t.transaction_date, t.amount, t.notes,
                   c.name AS category_name, c.color AS category_color, c.icon AS category_icon
            FROM transactions t
            LEFT JOIN categories c ON c.id = t.category_id AND c.user_id = t.user_id
            WHERE t.user_id = $1 AND t.transaction_date BETWEEN $2 AND $3
            ORDER BY t.transaction_date DESC, t.id DESC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&mut *self.conn)
        .await?;

        records.into_iter().map(TransactionRecord::try_from).collect()
    }

    pub async fn delete(&mut self, user_id: &str, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use budgeting::TransactionType;
    use chrono::NaiveDate;
    use database::get_test_db;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(12, 0, 0).unwrap()
    }

    fn request(user: &str, category_id: Option<i64>, when: NaiveDateTime, dollars: f64) -> CreateTransactionRequest {
        CreateTransactionRequest::new(
            user.to_string(),
            category_id,
            TransactionType::Expense,
            when,
            dollars,
            Some("Notes".into()),
        )
        .unwrap()
    }

    async fn setup_category(conn: &mut database::Connection, user: &str) -> i64 {
        sqlx::query_scalar(
            "INSERT INTO categories (user_id, name, color, type, icon) VALUES ($1, 'Food', '#FFB3BA', 'expense', '🍔') RETURNING id",
        )
        .bind(user)
        .fetch_one(&mut *conn)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_join_category() {
        let db = get_test_db().await;
        let mut uow = db.begin().await.unwrap();
        let food = setup_category(uow.connection(), "u1").await;
        let mut repo = TransactionRepository::new(uow.connection());

        let with_cat = repo.create(&request("u1", Some(food), at(2026, 1, 2), 10.0)).await.unwrap();
        let without = repo.create(&request("u1", None, at(2026, 1, 1), 2.5)).await.unwrap();
        assert!(with_cat > 0 && without > with_cat);

        let list = repo.list_between("u1", at(2026, 1, 1), at(2026, 1, 31)).await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].amount, 1000);
        assert_eq!(list[0].notes, Some("Notes".to_string()));
        assert_eq!(list[0].category.name(), "Food");
        assert_eq!(list[0].category.icon(), Some("🍔"));
        assert_eq!(list[1].category, CategoryRef::Uncategorized);
    }

    #[tokio::test]
    async fn test_other_users_category_reads_as_uncategorized() {
        let db = get_test_db().await;
        let mut uow = db.begin().await.unwrap();
        let foreign = setup_category(uow.connection(), "u2").await;
        let mut repo = TransactionRepository::new(uow.connection());

        repo.create(&request("u1", Some(foreign), at(2026, 1, 5), 1.0)).await.unwrap();
        let list = repo.list_between("u1", at(2026, 1, 1), at(2026, 1, 31)).await.unwrap();
        assert_eq!(list[0].category, CategoryRef::Uncategorized);
    }

    #[tokio::test]
    async fn test_list_between_is_inclusive_and_sorted() {
        let db = get_test_db().await;
        let mut uow = db.begin().await.unwrap();
        let mut repo = TransactionRepository::new(uow.connection());

        repo.create(&request("u1", None, at(2026, 1, 1), 1.0)).await.unwrap();
        repo.create(&request("u1", None, at(2026, 1, 31), 2.0)).await.unwrap();
        repo.create(&request("u1", None, at(2026, 2, 1), 3.0)).await.unwrap();
        repo.create(&request("u2", None, at(2026, 1, 15), 4.0)).await.unwrap();

        let list = repo.list_between("u1", at(2026, 1, 1), at(2026, 1, 31)).await.unwrap();
        let amounts: Vec<i64> = list.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![200, 100]);
    }

    #[tokio::test]
    async fn test_delete_transaction() {
        let db = get_test_db().await;
        let mut uow = db.begin().await.unwrap();
        let mut repo = TransactionRepository::new(uow.connection());

        let id = repo.create(&request("u1", None, at(2026, 1, 1), 10.0)).await.unwrap();
        assert!(matches!(repo.delete("u2", id).await, Err(RepositoryError::NotFound)));

        repo.delete("u1", id).await.unwrap();
        assert!(repo.list_between("u1", at(2026, 1, 1), at(2026, 1, 1)).await.unwrap().is_empty());
    }
}
