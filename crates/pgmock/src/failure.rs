//! The harness-assertion channel.
//!
//! A failure means the test or its ledger is wrong. Failures never travel
//! through `Result`; the call still returns the declared canned response so
//! later assertions in the same test are not masked.

use std::sync::{Mutex, PoisonError};

use similar::{ChangeTag, TextDiff};
use thiserror::Error;

use pgmock_core::Value;

/// An expectation the calling code did not meet.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Failure {
    /// A call arrived after the ledger was exhausted.
    #[error("@ {index} extra query: {sql}")]
    ExtraQuery { index: usize, sql: String },

    #[error("@ {index} unexpected query:\ngot:\n\t'{got}'\nexpected:\n\t'{expected}'\ndiff:\n\t{diff}")]
    UnexpectedSql {
        index: usize,
        got: String,
        expected: String,
        diff: String,
    },

    #[error("args of different lengths @ {index} {sql}: expected {expected}, got {got}")]
    ArgCount {
        index: usize,
        sql: String,
        expected: usize,
        got: usize,
    },

    #[error("sql args aren't equal for query # {index}: {sql}\n\targ {position}: expected {expected}, got {got}")]
    ArgMismatch {
        index: usize,
        sql: String,
        position: usize,
        expected: Value,
        got: Value,
    },

    /// A text-encoded argument could not be compared.
    #[error("cannot text-encode arg {position} for query # {index}: {message}")]
    ArgEncoding {
        index: usize,
        position: usize,
        message: String,
    },

    /// An exec result was not exactly one row holding one command tag.
    #[error("mock exec: {problem}: {rows:?}\n in {context}\n {sql}")]
    ExecShape {
        context: &'static str,
        sql: String,
        problem: &'static str,
        rows: Vec<Vec<Value>>,
    },

    #[error("{count} ledger entries never consumed, next expected: {next_sql}")]
    Unconsumed { count: usize, next_sql: String },
}

/// Receives harness failures.
pub trait FailureReporter: Send + Sync {
    fn report(&self, failure: Failure);
}

/// Collects failures for inspection at the end of a test.
#[derive(Debug, Default)]
pub struct FailureLog {
    failures: Mutex<Vec<Failure>>,
}

impl FailureLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return every collected failure.
    pub fn take(&self) -> Vec<Failure> {
        std::mem::take(&mut *self.failures.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn len(&self) -> usize {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FailureReporter for FailureLog {
    fn report(&self, failure: Failure) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(failure);
    }
}

/// Fails the test at the offending call.
#[derive(Debug, Default, Clone, Copy)]
pub struct PanicReporter;

impl FailureReporter for PanicReporter {
    fn report(&self, failure: Failure) {
        panic!("{failure}");
    }
}

/// Log a failure and hand it to the reporter.
pub(crate) fn report(reporter: &dyn FailureReporter, failure: Failure) {
    tracing::warn!(%failure, "sql expectation failed");
    reporter.report(failure);
}

/// Render failures as a numbered list.
pub fn render(failures: &[Failure]) -> String {
    let mut out = format!("{} sql expectation failure(s):", failures.len());
    for (i, failure) in failures.iter().enumerate() {
        out.push_str(&format!("\n{}) {}", i + 1, failure));
    }
    out
}

/// Word-level diff of two statements: `[-removed-]` and `{+added+}` spans
/// turn `got` into `expected`.
pub fn diff_sql(got: &str, expected: &str) -> String {
    let diff = TextDiff::from_words(got, expected);
    let mut out = String::new();
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Equal => out.push_str(change.value()),
            ChangeTag::Delete => {
                out.push_str("[-");
                out.push_str(change.value());
                out.push_str("-]");
            }
            ChangeTag::Insert => {
                out.push_str("{+");
                out.push_str(change.value());
                out.push_str("+}");
            }
        }
    }
    out
}
