//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Once;

use chrono::{DateTime, TimeZone, Utc};
use tracing_subscriber::EnvFilter;

use pgmock::{RecorderConfig, SqlQuery, SqlRecorder};
use pgmock_ingest::{Data, Exemplar, Insertable, Sample, Series};

static TRACING: Once = Once::new();

/// Install a `fmt` subscriber that writes through the test harness.
///
/// Filtered by `RUST_LOG`. Safe to call from every test.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A recorder that collects failures without checking them on drop.
///
/// For tests that inspect `take_failures` themselves.
pub fn collecting_recorder(queries: Vec<SqlQuery>) -> SqlRecorder {
    SqlRecorder::with_config(
        queries,
        RecorderConfig {
            verify_on_drop: false,
            ..Default::default()
        },
    )
}

/// Serialize a ledger to the JSON form `pgmock::ledger::from_json` reads.
pub fn ledger_json(queries: &[SqlQuery]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(queries)
}

/// Write a ledger file named `name` into `dir`.
pub fn write_ledger(dir: &Path, name: &str, queries: &[SqlQuery]) -> io::Result<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, ledger_json(queries)?)?;
    Ok(path)
}

/// A fixed receive time so assertions on `Data` are stable.
pub fn received_time() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0)
        .single()
        .unwrap_or_default()
}

/// `count` samples one second apart, starting at `start_ms`.
pub fn samples(start_ms: i64, count: usize) -> Vec<Sample> {
    (0..count)
        .map(|i| Sample {
            timestamp_ms: start_ms + i as i64 * 1000,
            value: i as f64,
        })
        .collect()
}

/// A `Data` batch with one sample row per `(metric, labels, count)` entry.
pub fn sample_data<'a>(
    rows: impl IntoIterator<Item = (&'a str, &'a [(&'a str, &'a str)], usize)>,
) -> Data {
    let mut data = Data::new(received_time());
    for (metric, labels, count) in rows {
        data.push(Insertable::samples(
            Series::new(metric, labels.iter().copied()),
            samples(0, count),
        ));
    }
    data
}

/// An exemplar row for `metric` carrying `count` exemplars.
pub fn exemplar_row(metric: &str, labels: &[(&str, &str)], count: usize) -> Insertable {
    let exemplars = (0..count)
        .map(|i| Exemplar {
            labels: [("trace_id".to_owned(), format!("{i:016x}"))].into_iter().collect(),
            timestamp_ms: i as i64 * 1000,
            value: i as f64,
        })
        .collect();
    Insertable::exemplars(Series::new(metric, labels.iter().copied()), exemplars)
}
