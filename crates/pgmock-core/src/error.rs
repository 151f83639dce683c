//! Errors a fake connection hands back to calling code.
//!
//! These travel through the normal `Result` channel exactly as a real driver
//! error would. Expectation mismatches are not errors; see the recorder's
//! failure channel for those.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Driver-facing error, declared in a ledger or produced by a cursor.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SqlError {
    #[error("no rows in result set")]
    NoRows,

    /// A call arrived after every ledger entry was consumed.
    #[error("extra query at ledger position {index}: {sql}")]
    ExtraQuery { index: usize, sql: String },

    #[error("mock scanning error, no more results: at row {position} of {len}")]
    NoMoreRows { position: usize, len: usize },

    #[error("mock scanning error, missing results for scanning: got {got} columns, wanted {wanted}")]
    MissingColumns { got: usize, wanted: usize },

    #[error("column {column}: wrong value type {value} for scan into {target}")]
    WrongType {
        column: usize,
        value: String,
        target: String,
    },

    /// A batch result cursor was read past the statements the batch consumed.
    #[error("batch result {index} out of range: batch holds {len} results")]
    BatchExhausted { index: usize, len: usize },

    #[error("conversion error: {message}")]
    Conversion { message: String },

    /// Server-side error carrying a SQLSTATE code.
    #[error("ERROR: {message} (SQLSTATE {code})")]
    Database { code: String, message: String },

    #[error("{message}")]
    Other { message: String },
}

impl SqlError {
    pub fn database(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Database {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    pub fn conversion(message: impl Into<String>) -> Self {
        Self::Conversion {
            message: message.into(),
        }
    }

    /// SQLSTATE of a server error, if this is one.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Database { code, .. } => Some(code),
            _ => None,
        }
    }
}

/// Result type for driver operations.
pub type Result<T> = std::result::Result<T, SqlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_error_display() {
        let err = SqlError::database("23505", "duplicate key value");
        assert_eq!(
            err.to_string(),
            "ERROR: duplicate key value (SQLSTATE 23505)"
        );
        assert_eq!(err.code(), Some("23505"));
        assert_eq!(SqlError::NoRows.code(), None);
    }

    #[test]
    fn test_error_json_shape() {
        let err: SqlError =
            serde_json::from_str(r#"{"kind":"other","message":"boom"}"#).unwrap();
        assert_eq!(err, SqlError::other("boom"));
    }
}
