//! Connection traits: the shape of a SQL client the fakes implement.
//!
//! Calling code written against [`Connection`] can run against a real
//! driver adapter or a [`SqlRecorder`](crate::SqlRecorder) unchanged.

use async_trait::async_trait;

use pgmock_core::{CommandTag, Result, Row, Rows, Value};

use crate::batch::Batch;

/// A SQL connection.
///
/// Methods are async to match async clients; the fake never suspends.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Execute a statement and return its command tag.
    async fn exec(&self, sql: &str, args: &[Value]) -> Result<CommandTag>;

    /// Run a query and return a cursor over its rows.
    async fn query(&self, sql: &str, args: &[Value]) -> Result<Box<dyn Rows>>;

    /// Run a query expected to return one row. Errors surface on `scan`.
    async fn query_row(&self, sql: &str, args: &[Value]) -> Box<dyn Row>;

    /// Start an empty batch.
    fn new_batch(&self) -> Batch;

    /// Submit every queued statement and return their results for replay.
    async fn send_batch(&self, batch: Batch) -> Result<Box<dyn BatchResults>>;

    fn close(&self);
}

/// Results of a submitted batch, read back in queue order.
pub trait BatchResults: Send {
    /// Read the next result as if sent with [`Connection::exec`].
    fn exec(&mut self) -> Result<CommandTag>;

    /// Read the next result as if sent with [`Connection::query`].
    fn query(&mut self) -> Result<Box<dyn Rows>>;

    /// Read the next result as if sent with [`Connection::query_row`].
    fn query_row(&mut self) -> Box<dyn Row>;

    fn close(&mut self) -> Result<()>;
}
