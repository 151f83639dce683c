//! The interfaces the ingest fakes stand in for.
//!
//! Implementations take `&mut self` for writes and carry no locking; share
//! one across threads only behind external synchronization.

use crate::error::Result;
use crate::model::{Data, Metadata, MetricInfo};

/// Lookup of metric table information by name.
pub trait MetricCache {
    /// Get the cached info for a metric.
    ///
    /// Returns `EntryNotFound` on a miss.
    fn get(&self, schema: &str, metric: &str, is_exemplar: bool) -> Result<MetricInfo>;

    /// Store info for a metric.
    fn set(&mut self, schema: &str, metric: &str, info: MetricInfo, is_exemplar: bool)
        -> Result<()>;

    /// Number of cached entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries.
    fn cap(&self) -> usize;

    /// Number of entries evicted so far.
    fn evictions(&self) -> u64;
}

/// Writes ingested data to the database.
pub trait Inserter {
    /// Insert a batch of series data, assigning series ids in place.
    ///
    /// Returns the number of points inserted.
    fn insert_ts(&mut self, data: &mut Data) -> Result<u64>;

    /// Insert data received from a client.
    fn insert_new_data(&mut self, data: &mut Data) -> Result<u64>;

    /// Insert metric metadata. Returns the number of rows inserted.
    fn insert_metadata(&mut self, metadata: &[Metadata]) -> Result<u64>;

    /// Finish any pending metric table creation.
    fn complete_metric_creation(&mut self) -> Result<()>;

    fn close(&mut self);
}
