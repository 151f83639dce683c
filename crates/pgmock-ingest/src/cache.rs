//! In-memory metric cache fake with injectable errors.

use std::collections::HashMap;

use crate::error::{IngestError, Result};
use crate::model::MetricInfo;
use crate::traits::MetricCache;

/// Composite cache key.
///
/// Both `get` and `set` key on the exemplar flag, so an exemplar metric and a
/// sample metric with the same schema and name are distinct entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetricKey {
    pub schema: String,
    pub metric: String,
    pub is_exemplar: bool,
}

impl MetricKey {
    pub fn new(schema: &str, metric: &str, is_exemplar: bool) -> Self {
        Self {
            schema: schema.to_owned(),
            metric: metric.to_owned(),
            is_exemplar,
        }
    }
}

/// Metric cache fake.
///
/// No eviction and no capacity bound: `cap()` reports the current entry count
/// and `evictions()` is always zero.
#[derive(Debug, Default)]
pub struct MockMetricCache {
    pub metric_cache: HashMap<MetricKey, MetricInfo>,
    /// Returned by every `get` when set.
    pub get_metric_err: Option<IngestError>,
    /// Returned by every `set` when set; the entry is stored regardless.
    pub set_metric_err: Option<IngestError>,
}

impl MockMetricCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_get_err(mut self, err: IngestError) -> Self {
        self.get_metric_err = Some(err);
        self
    }

    pub fn with_set_err(mut self, err: IngestError) -> Self {
        self.set_metric_err = Some(err);
        self
    }

    /// Pre-populate an entry.
    pub fn with_entry(
        mut self,
        schema: &str,
        metric: &str,
        is_exemplar: bool,
        info: MetricInfo,
    ) -> Self {
        self.metric_cache
            .insert(MetricKey::new(schema, metric, is_exemplar), info);
        self
    }
}

impl MetricCache for MockMetricCache {
    fn get(&self, schema: &str, metric: &str, is_exemplar: bool) -> Result<MetricInfo> {
        if let Some(err) = &self.get_metric_err {
            return Err(err.clone());
        }

        self.metric_cache
            .get(&MetricKey::new(schema, metric, is_exemplar))
            .cloned()
            .ok_or(IngestError::EntryNotFound)
    }

    fn set(
        &mut self,
        schema: &str,
        metric: &str,
        info: MetricInfo,
        is_exemplar: bool,
    ) -> Result<()> {
        self.metric_cache
            .insert(MetricKey::new(schema, metric, is_exemplar), info);
        match &self.set_metric_err {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn len(&self) -> usize {
        self.metric_cache.len()
    }

    fn cap(&self) -> usize {
        self.metric_cache.len()
    }

    fn evictions(&self) -> u64 {
        0
    }
}
