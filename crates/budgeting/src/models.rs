use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Money in minor units.
pub type Cents = i64;

/// Largest amount accepted on entry: one trillion major units.
pub const MAX_AMOUNT: Cents = 100_000_000_000_000;

/// Converts a decimal amount in major units to cents, rounding half away
/// from zero. `None` for non-finite input or magnitudes above [`MAX_AMOUNT`].
pub fn cents_from_major(amount: f64) -> Option<Cents> {
    if !amount.is_finite() {
        return None;
    }
    let cents = (amount * 100.0).round();
    if cents.abs() > MAX_AMOUNT as f64 {
        return None;
    }
    Some(cents as Cents)
}

pub const UNCATEGORIZED_NAME: &str = "Uncategorized";
pub const UNCATEGORIZED_COLOR: &str = "#94a3b8";
pub const UNCATEGORIZED_ICON: &str = "📦";

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Income => write!(f, "income"),
            TransactionType::Expense => write!(f, "expense"),
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(format!("Unknown transaction type: {}", other)),
        }
    }
}

/// Display data of a category as joined onto a transaction.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct CategoryInfo {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub icon: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CategoryRef {
    Assigned(CategoryInfo),
    Uncategorized,
}

impl CategoryRef {
    /// Grouping key; every uncategorized row shares `None`.
    pub fn id(&self) -> Option<i64> {
        match self {
            CategoryRef::Assigned(info) => Some(info.id),
            CategoryRef::Uncategorized => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            CategoryRef::Assigned(info) => &info.name,
            CategoryRef::Uncategorized => UNCATEGORIZED_NAME,
        }
    }

    pub fn color(&self) -> &str {
        match self {
            CategoryRef::Assigned(info) => &info.color,
            CategoryRef::Uncategorized => UNCATEGORIZED_COLOR,
        }
    }

    pub fn icon(&self) -> Option<&str> {
        match self {
            CategoryRef::Assigned(info) => info.icon.as_deref(),
            CategoryRef::Uncategorized => Some(UNCATEGORIZED_ICON),
        }
    }
}

impl From<Option<CategoryInfo>> for CategoryRef {
    fn from(info: Option<CategoryInfo>) -> Self {
        info.map_or(CategoryRef::Uncategorized, CategoryRef::Assigned)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Transaction {
    pub amount: Cents, // never negative, direction comes from `kind`
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub transaction_date: NaiveDateTime,
    pub category: CategoryRef,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Budget {
    pub amount: Cents,
    pub month: u32,
    pub year: i32,
    pub category_id: Option<i64>, // None: whole-period budget
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    Safe,
    Warning,
    Danger,
}

impl BudgetStatus {
    pub fn label(&self) -> &'static str {
        match self {
            BudgetStatus::Safe => "On track",
            BudgetStatus::Warning => "Warning",
            BudgetStatus::Danger => "Over budget",
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct BudgetSummary {
    pub total_budget: Cents,
    pub total_spent: Cents,
    pub remaining: Cents,
    pub days_left: u32,
    pub daily_allowance: Cents,
    pub percentage: f64,
    pub status: BudgetStatus,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct CategoryInsight {
    pub category: CategoryRef,
    pub total_amount: Cents,
}

impl CategoryInsight {
    pub fn name(&self) -> &str {
        self.category.name()
    }

    pub fn color(&self) -> &str {
        self.category.color()
    }

    pub fn icon(&self) -> Option<&str> {
        self.category.icon()
    }

    /// Fraction of `total` taken by this category, 0 when `total` is 0.
    pub fn share_of(&self, total: Cents) -> f64 {
        if total == 0 {
            0.0
        } else {
            self.total_amount as f64 / total as f64
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct CategoryBreakdown {
    pub categories: Vec<CategoryInsight>,
    pub total: Cents,
}
