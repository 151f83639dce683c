//! Error types for the ingest fakes.

use pgmock_core::SqlError;
use thiserror::Error;

/// Errors returned by the metric cache and inserter.
///
/// `Clone` so an injected error can be returned on every call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    /// Cache lookup miss.
    #[error("entry not found")]
    EntryNotFound,

    /// Database error surfaced by the write path.
    #[error("sql error: {0}")]
    Sql(#[from] SqlError),

    #[error("{message}")]
    Other { message: String },
}

impl IngestError {
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

/// Result type for ingest operations.
pub type Result<T> = std::result::Result<T, IngestError>;
