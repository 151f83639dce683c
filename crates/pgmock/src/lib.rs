//! # pgmock
//!
//! A deterministic fake for a SQL client connection.
//!
//! ## Overview
//!
//! Code under test talks to a [`Connection`]. In tests that connection is a
//! [`SqlRecorder`] holding an ordered ledger of expected calls:
//!
//! - **Ledger**: each [`SqlQuery`] names the statement, its arguments and the
//!   canned rows or error to answer with. Entries are consumed once, in order.
//! - **Matching**: statement text is compared with whitespace collapsed;
//!   arguments are compared exactly, as multisets, or by text encoding.
//! - **Rows**: [`MockRows`] decodes canned values into typed destinations the
//!   way a real driver would.
//! - **Batches**: a [`Batch`] consumes one entry per queued statement and
//!   replays them through [`MockBatchResult`].
//!
//! Mismatches are reported as [`Failure`]s through a [`FailureReporter`] and
//! never change the canned response.
//!
//! ## Usage
//!
//! ```rust
//! use pgmock::{args, rows, Connection, Row, ScanTarget, SqlQuery, SqlRecorder};
//!
//! async fn example() {
//!     let recorder = SqlRecorder::new(vec![
//!         SqlQuery::new("SELECT id FROM series WHERE name = $1")
//!             .args(args!["cpu"])
//!             .results(rows![[7i64]]),
//!     ]);
//!
//!     let mut id = 0i64;
//!     recorder
//!         .query_row("SELECT id\n  FROM series WHERE name = $1", &args!["cpu"])
//!         .await
//!         .scan(&mut [ScanTarget::from(&mut id)])
//!         .unwrap();
//!     assert_eq!(id, 7);
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `pgmock::core` - values, wrapper types, scan destinations and cursor traits
//! - `pgmock::ingest` - ingest model and the metric cache and inserter fakes

pub mod batch;
pub mod connection;
pub mod error;
pub mod failure;
pub mod ledger;
pub mod recorder;
pub mod rows;

// Re-export component crates
pub use pgmock_core as core;
pub use pgmock_ingest as ingest;

// Re-export main types for convenience
pub use batch::{Batch, BatchItem, MockBatchResult};
pub use connection::{BatchResults, Connection};
pub use error::{LedgerError, Result};
pub use failure::{Failure, FailureLog, FailureReporter, PanicReporter};
pub use ledger::SqlQuery;
pub use recorder::{RecorderConfig, SqlRecorder};
pub use rows::MockRows;

// Re-export commonly used core types
pub use pgmock_core::{
    args, rows, CommandTag, Row, RowResults, Rows, ScanTarget, SeriesEpoch, SeriesId, SqlError,
    Utf8Text, Utf8TextArray, Value,
};
