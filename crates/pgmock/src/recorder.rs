//! The Expectation Recorder: a fake connection that matches every call
//! against an ordered ledger and answers with the matched entry's canned
//! response.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use pgmock_core::{CommandTag, Result, Row, RowResults, Rows, SqlError, Value};

use crate::batch::{Batch, MockBatchResult};
use crate::connection::{BatchResults, Connection};
use crate::failure::{self, Failure, FailureLog, FailureReporter, PanicReporter};
use crate::ledger::{self, SqlQuery};
use crate::rows::MockRows;

/// Configuration for the recorder.
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Collapse whitespace runs before comparing statement text.
    pub normalize_whitespace: bool,
    /// Panic at the failing call instead of collecting failures.
    pub fail_fast: bool,
    /// Panic on drop if collected failures were never taken.
    pub verify_on_drop: bool,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            normalize_whitespace: true,
            fail_fast: false,
            verify_on_drop: true,
        }
    }
}

struct LedgerState {
    queries: Vec<SqlQuery>,
    next_query: usize,
}

/// A [`Connection`] that replays an expectation ledger.
///
/// Every call, direct or from a batch, consumes the next ledger entry under
/// a single lock. Mismatches go to the failure reporter; the caller always
/// receives the entry's declared response.
pub struct SqlRecorder {
    state: Mutex<LedgerState>,
    reporter: Arc<dyn FailureReporter>,
    /// Present when failures are collected rather than raised.
    log: Option<Arc<FailureLog>>,
    config: RecorderConfig,
}

impl SqlRecorder {
    /// Create a recorder with the default configuration.
    pub fn new(queries: Vec<SqlQuery>) -> Self {
        Self::with_config(queries, RecorderConfig::default())
    }

    pub fn with_config(queries: Vec<SqlQuery>, config: RecorderConfig) -> Self {
        if config.fail_fast {
            return Self::build(queries, config, Arc::new(PanicReporter), None);
        }
        let log = Arc::new(FailureLog::new());
        Self::build(queries, config, log.clone(), Some(log))
    }

    /// Create a recorder that hands failures to `reporter`.
    ///
    /// `fail_fast` and `verify_on_drop` have no effect; the reporter decides.
    pub fn with_reporter(
        queries: Vec<SqlQuery>,
        config: RecorderConfig,
        reporter: Arc<dyn FailureReporter>,
    ) -> Self {
        Self::build(queries, config, reporter, None)
    }

    fn build(
        queries: Vec<SqlQuery>,
        config: RecorderConfig,
        reporter: Arc<dyn FailureReporter>,
        log: Option<Arc<FailureLog>>,
    ) -> Self {
        Self {
            state: Mutex::new(LedgerState {
                queries,
                next_query: 0,
            }),
            reporter,
            log,
            config,
        }
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Verification
    // ─────────────────────────────────────────────────────────────────────────

    /// Remove and return the failures collected so far.
    ///
    /// Always empty for fail-fast recorders and custom reporters.
    pub fn take_failures(&self) -> Vec<Failure> {
        self.log.as_ref().map(|log| log.take()).unwrap_or_default()
    }

    /// Number of ledger entries not yet consumed.
    pub fn remaining(&self) -> usize {
        let state = self.lock();
        state.queries.len().saturating_sub(state.next_query)
    }

    /// Report a failure if any ledger entry was never consumed.
    pub fn assert_consumed(&self) {
        let unconsumed = {
            let state = self.lock();
            state.queries.get(state.next_query).map(|next| Failure::Unconsumed {
                count: state.queries.len() - state.next_query,
                next_sql: next.sql.clone(),
            })
        };
        if let Some(failure) = unconsumed {
            failure::report(&*self.reporter, failure);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Matching
    // ─────────────────────────────────────────────────────────────────────────

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Consume the next entry and check the call against it.
    ///
    /// The caller holds the lock for the whole match.
    fn check_query(
        &self,
        state: &mut LedgerState,
        sql: &str,
        args: &[Value],
    ) -> (RowResults, Option<SqlError>) {
        let index = state.next_query;
        if index >= state.queries.len() {
            failure::report(
                &*self.reporter,
                Failure::ExtraQuery {
                    index,
                    sql: sql.to_owned(),
                },
            );
            return (
                Vec::new(),
                Some(SqlError::ExtraQuery {
                    index,
                    sql: sql.to_owned(),
                }),
            );
        }
        state.next_query += 1;
        let entry = &state.queries[index];

        let (got, expected) = if self.config.normalize_whitespace {
            (ledger::normalize(sql), ledger::normalize(&entry.sql))
        } else {
            (sql.to_owned(), entry.sql.clone())
        };
        if got != expected {
            let diff = failure::diff_sql(&got, &expected);
            failure::report(
                &*self.reporter,
                Failure::UnexpectedSql {
                    index,
                    got,
                    expected,
                    diff,
                },
            );
        }

        for arg_failure in ledger::check_args(index, sql, entry, args) {
            failure::report(&*self.reporter, arg_failure);
        }

        tracing::debug!(index, sql = %entry.sql, "matched ledger entry");
        (entry.results.clone(), entry.err.clone())
    }

    fn record(&self, sql: &str, args: &[Value]) -> (RowResults, Option<SqlError>) {
        let mut state = self.lock();
        self.check_query(&mut state, sql, args)
    }
}

#[async_trait]
impl Connection for SqlRecorder {
    async fn exec(&self, sql: &str, args: &[Value]) -> Result<CommandTag> {
        let (results, err) = self.record(sql, args);

        let tag = match ledger::command_tag(&results) {
            Ok(tag) => tag,
            Err(problem) => {
                failure::report(
                    &*self.reporter,
                    Failure::ExecShape {
                        context: "Exec",
                        sql: sql.to_owned(),
                        problem,
                        rows: results,
                    },
                );
                CommandTag::default()
            }
        };

        match err {
            Some(err) => Err(err),
            None => Ok(tag),
        }
    }

    async fn query(&self, sql: &str, args: &[Value]) -> Result<Box<dyn Rows>> {
        let (results, err) = self.record(sql, args);
        match err {
            Some(err) => Err(err),
            None => Ok(Box::new(MockRows::new(results))),
        }
    }

    async fn query_row(&self, sql: &str, args: &[Value]) -> Box<dyn Row> {
        let (results, err) = self.record(sql, args);
        Box::new(MockRows::with_error(results, err))
    }

    fn new_batch(&self) -> Batch {
        Batch::new()
    }

    async fn send_batch(&self, batch: Batch) -> Result<Box<dyn BatchResults>> {
        let mut state = self.lock();
        let start = state.next_query;

        // Per-entry errors are replayed by the batch cursor.
        for item in batch.items() {
            let _ = self.check_query(&mut state, &item.sql, &item.args);
        }

        let consumed = state.queries[start..state.next_query].to_vec();
        tracing::debug!(start, queued = batch.len(), consumed = consumed.len(), "sent batch");

        Ok(Box::new(MockBatchResult::new(
            consumed,
            self.reporter.clone(),
        )))
    }

    fn close(&self) {}
}

impl Drop for SqlRecorder {
    fn drop(&mut self) {
        if !self.config.verify_on_drop || std::thread::panicking() {
            return;
        }
        let failures = self.take_failures();
        if !failures.is_empty() {
            panic!("{}", failure::render(&failures));
        }
    }
}
