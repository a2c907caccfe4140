use crate::budget_repository::MonthlyBudgetRepository;
use crate::models::{Category, CreateCategoryRequest, CreateMonthlyBudgetRequest};
use crate::repository::CategoryRepository;
use budgeting::{BudgetPeriod, TransactionType};
use database::{Database, RepositoryError};
use rand::seq::SliceRandom;
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Database error: {0}")]
    Infrastructure(String),
    #[error("Category already exists: {0}")]
    Conflict(String),
    #[error("Category not found")]
    NotFound,
}

impl From<RepositoryError> for CategoryError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => CategoryError::NotFound,
            RepositoryError::UniqueViolation(msg) => CategoryError::Conflict(msg),
            RepositoryError::CheckViolation(msg) | RepositoryError::ForeignKeyViolation(msg) => {
                CategoryError::InvalidInput(msg)
            }
            _ => CategoryError::Infrastructure(err.to_string()),
        }
    }
}

const PASTEL_COLORS: [&str; 20] = [
    "#FFB3BA", "#FFDFBA", "#FFFFBA", "#BAFFC9", "#BAE1FF",
    "#E2F0CB", "#FDFD96", "#FFC3A0", "#FFD1DC", "#D4F0F0",
    "#CCE2CB", "#B6CFB6", "#97C1A9", "#FCB7AF", "#FFDAC1",
    "#E7FFAC", "#FFABAB", "#D5AAFF", "#85E3FF", "#B9F6CA",
];

pub struct CategoryService;

impl CategoryService {
    fn get_random_pastel_color() -> String {
        let mut rng = rand::thread_rng();
        PASTEL_COLORS.choose(&mut rng).unwrap_or(&"#FFFFFF").to_string()
    }

    #[instrument(skip(db))]
    pub async fn create_category(
        db: &Database,
        user_id: &str,
        name: String,
        kind: TransactionType,
        color: Option<String>,
        icon: Option<String>,
    ) -> Result<i64, CategoryError> {
        let color = color.unwrap_or_else(Self::get_random_pastel_color);
        let req = CreateCategoryRequest::new(user_id.to_string(), name, color, kind, icon)
            .map_err(CategoryError::InvalidInput)?;

        let mut uow = db.begin().await?;
        let id = CategoryRepository::new(uow.connection()).create(&req).await?;
        uow.commit().await?;

        tracing::info!(id, "Created {} category", req.kind);
        Ok(id)
    }

    #[instrument(skip(db))]
    pub async fn list_categories(db: &Database, user_id: &str) -> Result<Vec<Category>, CategoryError> {
        let mut uow = db.begin().await?;
        let categories = CategoryRepository::new(uow.connection()).list(user_id).await?;
        Ok(categories)
    }

    #[instrument(skip(db))]
    pub async fn get_category(db: &Database, user_id: &str, id: i64) -> Result<Category, CategoryError> {
        let mut uow = db.begin().await?;
        CategoryRepository::new(uow.connection())
            .find_by_id(user_id, id)
            .await?
            .ok_or(CategoryError::NotFound)
    }

    /// Sets the limit for `period`. `category_id: None` sets the whole-month budget.
    #[instrument(skip(db))]
    pub async fn set_budget(
        db: &Database,
        user_id: &str,
        period: BudgetPeriod,
        category_id: Option<i64>,
        limit_dollars: f64,
    ) -> Result<i64, CategoryError> {
        let req = CreateMonthlyBudgetRequest::new(user_id.to_string(), period, category_id, limit_dollars)
            .map_err(CategoryError::InvalidInput)?;

        let mut uow = db.begin().await?;
        if let Some(id) = category_id {
            let category = CategoryRepository::new(uow.connection())
                .find_by_id(user_id, id)
                .await?
                .ok_or_else(|| CategoryError::InvalidInput(format!("Unknown category {}", id)))?;
            if category.kind != TransactionType::Expense {
                return Err(CategoryError::InvalidInput(format!(
                    "'{}' is an income category and cannot carry a spending limit",
                    category.name
                )));
            }
        }

        let id = MonthlyBudgetRepository::new(uow.connection()).upsert(&req).await?;
        uow.commit().await?;
        Ok(id)
    }

    /// Carries last month's limits into `period` when it has none yet.
    #[instrument(skip(db))]
    pub async fn ensure_budgets_exist(db: &Database, user_id: &str, period: BudgetPeriod) -> Result<u64, CategoryError> {
        let mut uow = db.begin().await?;
        let copied = MonthlyBudgetRepository::new(uow.connection())
            .copy_budgets(user_id, period.previous(), period)
            .await?;
        uow.commit().await?;

        if copied > 0 {
            tracing::info!(copied, "Copied budgets from {} into {}", period.previous(), period);
        }
        Ok(copied)
    }
}
