//! Error types for loading ledgers.

use thiserror::Error;

/// Errors that can occur while loading a ledger file.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid ledger: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for ledger loading.
pub type Result<T> = std::result::Result<T, LedgerError>;
