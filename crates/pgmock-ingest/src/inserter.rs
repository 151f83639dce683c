//! In-memory inserter fake.
//!
//! Assigns series ids in first-seen order and keeps every accepted batch so a
//! test can inspect what would have been written.

use std::collections::{BTreeMap, HashMap};

use pgmock_core::SeriesId;

use crate::error::{IngestError, Result};
use crate::model::{Data, Insertable, Metadata};
use crate::traits::Inserter;

/// Inserter fake with injectable errors for the two write phases.
#[derive(Debug, Default)]
pub struct MockInserter {
    /// Canonical series string to assigned id. Ids start at zero.
    pub inserted_series: HashMap<String, SeriesId>,
    /// Every accepted batch, in call order.
    pub inserted_data: Vec<BTreeMap<String, Vec<Insertable>>>,
    /// Fails the series-creation phase; the batch is not recorded.
    pub insert_series_err: Option<IngestError>,
    /// Fails the data-write phase; the batch is still recorded.
    pub insert_data_err: Option<IngestError>,
}

impl MockInserter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series_err(mut self, err: IngestError) -> Self {
        self.insert_series_err = Some(err);
        self
    }

    pub fn with_data_err(mut self, err: IngestError) -> Self {
        self.insert_data_err = Some(err);
        self
    }

    /// Id assigned to a canonical series string, if seen.
    pub fn series_id(&self, series: &str) -> Option<SeriesId> {
        self.inserted_series.get(series).copied()
    }

    fn assign_series_ids(&mut self, data: &mut Data) {
        for insertable in data.rows.values_mut().flatten() {
            let key = insertable.series().to_string();
            let next = SeriesId::new(self.inserted_series.len() as i64);
            let id = *self.inserted_series.entry(key).or_insert_with(|| {
                tracing::debug!(series_id = %next, "assigned new series id");
                next
            });
            insertable.series_mut().set_id(id);
        }
    }
}

impl Inserter for MockInserter {
    fn insert_ts(&mut self, data: &mut Data) -> Result<u64> {
        self.assign_series_ids(data);

        if let Some(err) = &self.insert_series_err {
            return Err(err.clone());
        }

        self.inserted_data.push(data.rows.clone());

        // A data-write failure reports nothing inserted.
        if let Some(err) = &self.insert_data_err {
            return Err(err.clone());
        }

        Ok(data.count() as u64)
    }

    fn insert_new_data(&mut self, data: &mut Data) -> Result<u64> {
        self.insert_ts(data)
    }

    fn insert_metadata(&mut self, metadata: &[Metadata]) -> Result<u64> {
        Ok(metadata.len() as u64)
    }

    fn complete_metric_creation(&mut self) -> Result<()> {
        Ok(())
    }

    fn close(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Sample, Series};
    use chrono::Utc;

    fn insertable(metric: &str, job: &str, points: usize) -> Insertable {
        let samples = (0..points)
            .map(|i| Sample {
                timestamp_ms: i as i64,
                value: i as f64,
            })
            .collect();
        Insertable::samples(Series::new(metric, [("job", job)]), samples)
    }

    #[test]
    fn test_same_series_reuses_id() {
        let mut inserter = MockInserter::new();
        let mut data = Data::new(Utc::now());
        data.push(insertable("cpu", "a", 1));
        data.push(insertable("cpu", "a", 2));

        let inserted = inserter.insert_ts(&mut data).unwrap();
        assert_eq!(inserted, 3);

        let rows = &data.rows["cpu"];
        assert_eq!(rows[0].series().id(), Some(SeriesId::new(0)));
        assert_eq!(rows[1].series().id(), Some(SeriesId::new(0)));
        assert_eq!(inserter.inserted_series.len(), 1);
    }

    #[test]
    fn test_ids_are_sequential_across_calls() {
        let mut inserter = MockInserter::new();

        let mut first = Data::new(Utc::now());
        first.push(insertable("cpu", "a", 1));
        first.push(insertable("cpu", "b", 1));
        inserter.insert_ts(&mut first).unwrap();

        let mut second = Data::new(Utc::now());
        second.push(insertable("cpu", "a", 1));
        second.push(insertable("cpu", "c", 1));
        inserter.insert_ts(&mut second).unwrap();

        let rows = &second.rows["cpu"];
        assert_eq!(rows[0].series().id(), Some(SeriesId::new(0)));
        assert_eq!(rows[1].series().id(), Some(SeriesId::new(2)));
        assert_eq!(inserter.inserted_data.len(), 2);
    }

    #[test]
    fn test_series_error_skips_recording() {
        let mut inserter = MockInserter::new().with_series_err(IngestError::other("no series"));
        let mut data = Data::new(Utc::now());
        data.push(insertable("cpu", "a", 4));

        let err = inserter.insert_ts(&mut data).unwrap_err();
        assert_eq!(err, IngestError::other("no series"));
        assert!(inserter.inserted_data.is_empty());
        // Ids are assigned before the failure.
        assert_eq!(data.rows["cpu"][0].series().id(), Some(SeriesId::new(0)));
    }

    #[test]
    fn test_data_error_still_records() {
        let mut inserter = MockInserter::new().with_data_err(IngestError::other("write failed"));
        let mut data = Data::new(Utc::now());
        data.push(insertable("cpu", "a", 5));

        let err = inserter.insert_new_data(&mut data).unwrap_err();
        assert_eq!(err, IngestError::other("write failed"));
        assert_eq!(inserter.inserted_data.len(), 1);
        assert_eq!(inserter.inserted_data[0]["cpu"][0].count(), 5);
    }

    #[test]
    fn test_metadata_and_completion() {
        let mut inserter = MockInserter::new();
        let metadata = vec![
            Metadata {
                metric_family: "cpu".into(),
                unit: "seconds".into(),
                kind: "counter".into(),
                help: "cpu time".into(),
            };
            3
        ];
        assert_eq!(inserter.insert_metadata(&metadata).unwrap(), 3);
        assert!(inserter.complete_metric_creation().is_ok());
        inserter.close();
    }
}
