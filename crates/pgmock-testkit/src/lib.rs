//! # pgmock Testkit
//!
//! Testing utilities for code built on pgmock.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: tracing setup, ledger files and sample ingest batches
//! - **Generators**: Proptest strategies for values, statements and ledgers
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use pgmock::ledger::normalize;
//! use pgmock_testkit::generators::whitespace_variant;
//!
//! proptest! {
//!     #[test]
//!     fn whitespace_is_collapsed((sql, variant) in whitespace_variant()) {
//!         prop_assert_eq!(normalize(&variant), sql);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use pgmock_testkit::fixtures::{init_tracing, sample_data};
//!
//! init_tracing();
//! let data = sample_data([("cpu", &[("job", "api")][..], 3)]);
//! assert_eq!(data.count(), 3);
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{collecting_recorder, init_tracing, ledger_json, sample_data, write_ledger};
pub use generators::{arg_value, ledger, permuted_int64s, whitespace_variant};
