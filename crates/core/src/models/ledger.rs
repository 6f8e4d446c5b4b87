use serde::{Deserialize, Serialize};

use super::budget::Budget;
use super::transaction::Transaction;

/// The main data container: the current transaction/budget snapshot the
/// engine computes over. All derived results (forecasts, scores, leaks,
/// suggestions) are recomputed from this on every call; nothing here is
/// persisted by the engine — storage is the host application's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    /// All transactions, kept sorted by date (oldest first)
    pub transactions: Vec<Transaction>,

    /// Per-category budgets (at most one per category)
    pub budgets: Vec<Budget>,

    /// Configured monthly income, used by the health score and the
    /// money-leak housing rule.
    #[serde(default)]
    pub monthly_income: f64,
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            transactions: Vec::new(),
            budgets: Vec::new(),
            monthly_income: 0.0,
        }
    }
}
