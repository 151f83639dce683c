//! Ingest domain model: series, samples and the batches handed to an inserter.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pgmock_core::{SeriesEpoch, SeriesId};

/// Label name carrying the metric name.
pub const METRIC_NAME_LABEL: &str = "__name__";

/// A time-series: a metric name plus its label set.
///
/// The id is unset until an inserter assigns one.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    metric_name: String,
    labels: BTreeMap<String, String>,
    id: Option<SeriesId>,
    epoch: SeriesEpoch,
}

impl Series {
    pub fn new<K, V>(metric_name: &str, labels: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            metric_name: metric_name.to_owned(),
            labels: labels
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .filter(|(k, _)| k != METRIC_NAME_LABEL)
                .collect(),
            id: None,
            epoch: SeriesEpoch::default(),
        }
    }

    pub fn metric_name(&self) -> &str {
        &self.metric_name
    }

    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }

    pub fn id(&self) -> Option<SeriesId> {
        self.id
    }

    pub fn set_id(&mut self, id: SeriesId) {
        self.id = Some(id);
    }

    pub fn epoch(&self) -> SeriesEpoch {
        self.epoch
    }

    pub fn set_epoch(&mut self, epoch: SeriesEpoch) {
        self.epoch = epoch;
    }
}

impl fmt::Display for Series {
    /// Canonical form: `{__name__="m", a="1", b="2"}` with labels sorted by name.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}={:?}", METRIC_NAME_LABEL, self.metric_name)?;
        for (name, value) in &self.labels {
            write!(f, ", {}={:?}", name, value)?;
        }
        f.write_str("}")
    }
}

/// One sample point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp_ms: i64,
    pub value: f64,
}

/// One exemplar point with its own label set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exemplar {
    pub labels: BTreeMap<String, String>,
    pub timestamp_ms: i64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Samples(Vec<Sample>),
    Exemplars(Vec<Exemplar>),
}

/// A series together with the points to insert for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Insertable {
    series: Series,
    payload: Payload,
}

impl Insertable {
    pub fn samples(series: Series, samples: Vec<Sample>) -> Self {
        Self {
            series,
            payload: Payload::Samples(samples),
        }
    }

    pub fn exemplars(series: Series, exemplars: Vec<Exemplar>) -> Self {
        Self {
            series,
            payload: Payload::Exemplars(exemplars),
        }
    }

    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn series_mut(&mut self) -> &mut Series {
        &mut self.series
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn is_exemplar(&self) -> bool {
        matches!(self.payload, Payload::Exemplars(_))
    }

    /// Number of points carried.
    pub fn count(&self) -> usize {
        match &self.payload {
            Payload::Samples(s) => s.len(),
            Payload::Exemplars(e) => e.len(),
        }
    }
}

/// A batch of insertables keyed by metric name.
#[derive(Debug, Clone, PartialEq)]
pub struct Data {
    pub rows: BTreeMap<String, Vec<Insertable>>,
    pub received_time: DateTime<Utc>,
}

impl Data {
    pub fn new(received_time: DateTime<Utc>) -> Self {
        Self {
            rows: BTreeMap::new(),
            received_time,
        }
    }

    /// Append an insertable under its series' metric name.
    pub fn push(&mut self, insertable: Insertable) {
        self.rows
            .entry(insertable.series().metric_name().to_owned())
            .or_default()
            .push(insertable);
    }

    /// Total number of points across all rows.
    pub fn count(&self) -> usize {
        self.rows.values().flatten().map(Insertable::count).sum()
    }
}

/// Metric metadata as sent by a scraper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub metric_family: String,
    pub unit: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub help: String,
}

/// Where a metric's data lives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricInfo {
    pub metric_id: i64,
    pub table_schema: String,
    pub table_name: String,
    pub series_table: String,
}
