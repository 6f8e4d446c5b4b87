use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Money coming in (salary, refunds, etc.)
    Income,
    /// Money going out
    Expense,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Income => write!(f, "Income"),
            TransactionType::Expense => write!(f, "Expense"),
        }
    }
}

/// A single transaction in the ledger.
///
/// **Important**: `amount` is always a non-negative magnitude; the direction
/// lives in `tx_type`. The engine never mutates transactions — edits go
/// through the facade, which replaces the entry wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: Uuid,

    /// Calendar date (no time component — daily granularity)
    pub date: NaiveDate,

    /// Non-negative amount magnitude
    pub amount: f64,

    /// Category name (e.g., "Groceries", "Coffee")
    pub category: String,

    /// Merchant / description text as entered or imported
    pub description: String,

    /// Income or Expense
    pub tx_type: TransactionType,
}

impl Transaction {
    pub fn new(
        tx_type: TransactionType,
        amount: f64,
        category: impl Into<String>,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            amount,
            category: category.into(),
            description: description.into(),
            tx_type,
        }
    }

    /// Shorthand for an expense transaction.
    pub fn expense(
        amount: f64,
        category: impl Into<String>,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self::new(TransactionType::Expense, amount, category, description, date)
    }

    /// Shorthand for an income transaction.
    pub fn income(
        amount: f64,
        category: impl Into<String>,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self::new(TransactionType::Income, amount, category, description, date)
    }

    pub fn is_expense(&self) -> bool {
        self.tx_type == TransactionType::Expense
    }

    pub fn is_income(&self) -> bool {
        self.tx_type == TransactionType::Income
    }
}
