use budgeting::{BudgetPeriod, CategoryRef, Cents, Transaction, TransactionType, cents_from_major};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A stored transaction with its category already joined.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct TransactionRecord {
    pub id: i64,
    pub user_id: String,
    pub category: CategoryRef,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub transaction_date: NaiveDateTime,
    pub amount: Cents,
    pub notes: Option<String>,
}

impl From<&TransactionRecord> for Transaction {
    fn from(record: &TransactionRecord) -> Self {
        Transaction {
            amount: record.amount,
            kind: record.kind,
            transaction_date: record.transaction_date,
            category: record.category.clone(),
        }
    }
}

#[derive(Debug, Serialize, Validate)]
pub struct CreateTransactionRequest {
    #[validate(length(min = 1, message = "User cannot be empty"))]
    user_id: String,
    category_id: Option<i64>,
    #[serde(rename = "type")]
    kind: TransactionType,
    transaction_date: NaiveDateTime,
    #[validate(range(min = 0, message = "Amount cannot be negative"))]
    amount: Cents,
    #[validate(length(max = 500, message = "Notes are limited to 500 characters"))]
    notes: Option<String>,
}

impl CreateTransactionRequest {
    pub fn new(
        user_id: String,
        category_id: Option<i64>,
        kind: TransactionType,
        transaction_date: NaiveDateTime,
        amount_dollars: f64,
        notes: Option<String>,
    ) -> Result<Self, String> {
        // Direction lives in `kind`; the stored amount is always positive.
        let amount = cents_from_major(amount_dollars.abs())
            .ok_or_else(|| format!("Amount must be a number no larger than {}", budgeting::MAX_AMOUNT / 100))?;

        let req = Self {
            user_id,
            category_id,
            kind,
            transaction_date,
            amount,
            notes: notes.filter(|n| !n.trim().is_empty()),
        };
        req.validate().map_err(|e| e.to_string())?;
        Ok(req)
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn category_id(&self) -> Option<i64> {
        self.category_id
    }

    pub fn kind(&self) -> TransactionType {
        self.kind
    }

    pub fn transaction_date(&self) -> NaiveDateTime {
        self.transaction_date
    }

    pub fn amount(&self) -> Cents {
        self.amount
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

#[derive(Debug, Serialize)]
pub struct MonthlySummary {
    pub period: BudgetPeriod,
    pub total_income: Cents,
    pub total_expenses: Cents,
    pub net: Cents,
}

impl MonthlySummary {
    pub fn from_records(period: BudgetPeriod, records: &[TransactionRecord]) -> Self {
        let mut total_income: Cents = 0;
        let mut total_expenses: Cents = 0;

        for t in records.iter().filter(|t| period.contains(t.transaction_date)) {
            match t.kind {
                TransactionType::Income => total_income = total_income.saturating_add(t.amount),
                TransactionType::Expense => total_expenses = total_expenses.saturating_add(t.amount),
            }
        }

        Self {
            period,
            total_income,
            total_expenses,
            net: total_income - total_expenses,
        }
    }
}
