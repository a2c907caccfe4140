use budgeting::{Budget, BudgetPeriod, CategoryInfo, Cents, TransactionType, cents_from_major};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Category {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub color: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub icon: Option<String>,
}

impl Category {
    /// Display data joined onto transactions of this category.
    pub fn info(&self) -> CategoryInfo {
        CategoryInfo {
            id: self.id,
            name: self.name.clone(),
            color: self.color.clone(),
            icon: self.icon.clone(),
        }
    }
}

#[derive(Debug, Serialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, message = "User cannot be empty"))]
    pub user_id: String,
    #[validate(length(min = 1, max = 64, message = "Category name must be 1-64 characters"))]
    pub name: String,
    pub color: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub icon: Option<String>,
}

impl CreateCategoryRequest {
    pub fn new(
        user_id: String,
        name: String,
        color: String,
        kind: TransactionType,
        icon: Option<String>,
    ) -> Result<Self, String> {
        let req = Self {
            user_id,
            name: name.trim().to_string(),
            color,
            kind,
            icon: icon.filter(|i| !i.trim().is_empty()),
        };
        req.validate().map_err(|e| e.to_string())?;
        Ok(req)
    }
}

/// Stored budget row. `category_id: None` is the whole-month budget.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct MonthlyBudget {
    pub id: i64,
    pub user_id: String,
    pub month: u32,
    pub year: i32,
    pub category_id: Option<i64>,
    pub amount: Cents,
}

impl From<MonthlyBudget> for Budget {
    fn from(row: MonthlyBudget) -> Self {
        Budget {
            amount: row.amount,
            month: row.month,
            year: row.year,
            category_id: row.category_id,
        }
    }
}

#[derive(Debug, Serialize, Validate)]
pub struct CreateMonthlyBudgetRequest {
    #[validate(length(min = 1, message = "User cannot be empty"))]
    pub user_id: String,
    #[validate(range(min = 1, max = 12, message = "Month must be between 1 and 12"))]
    pub month: u32,
    pub year: i32,
    pub category_id: Option<i64>,
    #[validate(range(min = 0, message = "Limit cannot be negative"))]
    pub amount: Cents,
}

impl CreateMonthlyBudgetRequest {
    pub fn new(
        user_id: String,
        period: BudgetPeriod,
        category_id: Option<i64>,
        limit_dollars: f64,
    ) -> Result<Self, String> {
        let amount = cents_from_major(limit_dollars)
            .ok_or_else(|| format!("Limit must be a number no larger than {}", budgeting::MAX_AMOUNT / 100))?;

        let req = Self {
            user_id,
            month: period.month(),
            year: period.year(),
            category_id,
            amount,
        };
        req.validate().map_err(|e| e.to_string())?;
        Ok(req)
    }
}
