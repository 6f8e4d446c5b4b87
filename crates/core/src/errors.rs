use thiserror::Error;

/// Unified error type for the entire moneylens-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
///
/// The numeric engine itself never fails: sparse or degenerate data produces
/// degraded results (fallback confidence, `InsufficientData` labels, zero
/// guards) rather than errors. Errors only occur at the ledger boundary
/// (invalid input, missing ids) and during JSON export/import.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Business Logic ──────────────────────────────────────────────
    #[error("Transaction validation failed: {0}")]
    ValidationError(String),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("No budget configured for category: {0}")]
    BudgetNotFound(String),

    // ── Serialization ───────────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}
