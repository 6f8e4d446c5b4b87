use serde::{Deserialize, Serialize};

/// A per-category spending budget.
///
/// Only the limit is stored. The spent amount is always *derived* from
/// transactions for a given period — never an independent source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// Category this budget applies to
    pub category: String,

    /// Monthly spending limit (>= 0)
    pub limit: f64,
}

impl Budget {
    pub fn new(category: impl Into<String>, limit: f64) -> Self {
        Self {
            category: category.into(),
            limit,
        }
    }
}

/// The reporting window for budget status computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetPeriod {
    /// The calendar month containing the as-of date
    CurrentMonth,
    /// The calendar month before the as-of date's month
    LastMonth,
    /// The last N calendar months, including the current one
    LastMonths(u32),
    /// Everything in the ledger
    AllTime,
}

/// Traffic-light classification of a budget's health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetLevel {
    /// Comfortably within the limit
    Good,
    /// At or above the warning threshold (actual or projected)
    Warning,
    /// At or above the limit (actual or projected)
    Danger,
}

impl std::fmt::Display for BudgetLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BudgetLevel::Good => write!(f, "Good"),
            BudgetLevel::Warning => write!(f, "Warning"),
            BudgetLevel::Danger => write!(f, "Danger"),
        }
    }
}

/// Computed status of one budget for a selected period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetStatus {
    /// Category the budget applies to
    pub category: String,

    /// The configured limit
    pub limit: f64,

    /// Sum of expense transactions in the category within the period
    pub spent: f64,

    /// spent / limit * 100 (0 when the limit is 0)
    pub percentage: f64,

    /// Linear daily-rate projection for the full month.
    /// Only present when the period is the current month.
    pub projected_total: Option<f64>,

    /// projected_total / limit * 100 (0 when the limit is 0)
    pub projected_percentage: Option<f64>,

    /// Traffic-light classification
    pub level: BudgetLevel,
}
