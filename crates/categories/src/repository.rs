use crate::models::{Category, CreateCategoryRequest};
use database::{self, RepositoryError};
use sqlx::FromRow;

#[derive(FromRow)]
struct CategoryRecord {
    id: i64,
    user_id: String,
    name: String,
    color: String,
    kind: String,
    icon: Option<String>,
}

impl TryFrom<CategoryRecord> for Category {
    type Error = RepositoryError;

    fn try_from(record: CategoryRecord) -> Result<Self, Self::Error> {
        Ok(Category {
            id: record.id,
            user_id: record.user_id,
            name: record.name,
            color: record.color,
            kind: record.kind.parse().map_err(RepositoryError::Corrupt)?,
            icon: record.icon,
        })
    }
}

pub(crate) struct CategoryRepository<'a> {
    conn: &'a mut database::Connection,
}

impl<'a> CategoryRepository<'a> {
    pub fn new(conn: &'a mut database::Connection) -> Self {
        Self { conn }
    }

    /// Names are unique per user and type, ignoring case.
    pub async fn create(&mut self, req: &CreateCategoryRequest) -> Result<i64, RepositoryError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO categories (user_id, name, color, type, icon) VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(&req.user_id)
        .bind(&req.name)
        .bind(&req.color)
        .bind(req.kind.to_string())
        .bind(&req.icon)
        .fetch_one(&mut *self.conn)
        .await
        .map_err(|e| match RepositoryError::from(e) {
            RepositoryError::UniqueViolation(_) => RepositoryError::UniqueViolation(format!(
                "{} category '{}' already exists",
                req.kind, req.name
            )),
            other => other,
        })?;

        Ok(id)
    }

    /// Categories of `user_id`, ordered by name.
    pub async fn list(&mut self, user_id: &str) -> Result<Vec<Category>, RepositoryError> {
        let records = sqlx::query_as::<_, CategoryRecord>(
            "SELECT id, user_id, name, color, type AS kind, icon FROM categories WHERE user_id = $1 ORDER BY name, id",
        )
        .bind(user_id)
        .fetch_all(&mut *self.conn)
        .await?;

        records.into_iter().map(Category::try_from).collect()
    }

    pub async fn find_by_id(&mut self, user_id: &str, id: i64) -> Result<Option<Category>, RepositoryError> {
        let record = sqlx::query_as::<_, CategoryRecord>(
            "SELECT id, user_id, name, color, type AS kind, icon FROM categories WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *self.conn)
        .await?;

        record.map(Category::try_from).transpose()
    }
}
