//! Batched statements: the builder callers queue into, and the cursor that
//! replays the submitted batch's results.
//!
//! Batch queries bundle several statements together to avoid a network round
//! trip per statement. Nothing is verified at queue time; each queued item is
//! matched against the ledger when the batch is sent.

use std::sync::Arc;

use pgmock_core::{CommandTag, Result, Row, Rows, SqlError, Value};

use crate::connection::BatchResults;
use crate::failure::{self, Failure, FailureReporter};
use crate::ledger::{self, SqlQuery};
use crate::rows::MockRows;

/// One queued statement.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchItem {
    pub sql: String,
    pub args: Vec<Value>,
}

/// Ordered list of statements waiting to be sent.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    items: Vec<BatchItem>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(&mut self, sql: &str, args: &[Value]) {
        self.items.push(BatchItem {
            sql: sql.to_owned(),
            args: args.to_vec(),
        });
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[BatchItem] {
        &self.items
    }
}

/// Replays the ledger entries a batch consumed.
///
/// Every `exec`, `query` or `query_row` call takes the next entry, whichever
/// queue call it logically belongs to.
pub struct MockBatchResult {
    idx: usize,
    queries: Vec<SqlQuery>,
    reporter: Arc<dyn FailureReporter>,
}

impl MockBatchResult {
    pub(crate) fn new(queries: Vec<SqlQuery>, reporter: Arc<dyn FailureReporter>) -> Self {
        Self {
            idx: 0,
            queries,
            reporter,
        }
    }

    /// Number of results this batch holds.
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    fn next_query(&mut self) -> Result<SqlQuery> {
        let index = self.idx;
        self.idx += 1;
        self.queries
            .get(index)
            .cloned()
            .ok_or(SqlError::BatchExhausted {
                index,
                len: self.queries.len(),
            })
    }
}

impl BatchResults for MockBatchResult {
    fn exec(&mut self) -> Result<CommandTag> {
        let q = self.next_query()?;

        let tag = match ledger::command_tag(&q.results) {
            Ok(tag) => tag,
            Err(problem) => {
                failure::report(
                    &*self.reporter,
                    Failure::ExecShape {
                        context: "batch Exec",
                        sql: q.sql.clone(),
                        problem,
                        rows: q.results.clone(),
                    },
                );
                CommandTag::default()
            }
        };

        match q.err {
            Some(err) => Err(err),
            None => Ok(tag),
        }
    }

    fn query(&mut self) -> Result<Box<dyn Rows>> {
        let q = self.next_query()?;
        match q.err {
            Some(err) => Err(err),
            None => Ok(Box::new(MockRows::new(q.results))),
        }
    }

    fn query_row(&mut self) -> Box<dyn Row> {
        match self.next_query() {
            Ok(q) => Box::new(MockRows::with_error(q.results, q.err)),
            Err(err) => Box::new(MockRows::with_error(Vec::new(), Some(err))),
        }
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
