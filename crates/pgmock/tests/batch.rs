//! Batch submission against the shared ledger.

use std::sync::Arc;

use pgmock::{
    args, rows, Connection, Failure, RecorderConfig, Row, Rows, ScanTarget, SqlError, SqlQuery,
    SqlRecorder,
};

fn insert(id: i64) -> SqlQuery {
    SqlQuery::new("INSERT INTO series (id) VALUES ($1)")
        .args(args![id])
        .tag("INSERT 0 1")
}

#[tokio::test]
async fn batch_consumes_one_entry_per_queued_statement() {
    let recorder = SqlRecorder::new(vec![
        insert(1),
        insert(2),
        SqlQuery::new("SELECT count(*) FROM series").results(rows![[2i64]]),
        SqlQuery::new("SELECT 1"),
    ]);

    let mut batch = recorder.new_batch();
    batch.queue("INSERT INTO series (id) VALUES ($1)", &args![1i64]);
    batch.queue("INSERT INTO series  (id) VALUES ($1)", &args![2i64]);
    batch.queue("SELECT count(*) FROM series", &[]);
    let mut results = recorder.send_batch(batch).await.unwrap();
    assert_eq!(recorder.remaining(), 1);

    assert_eq!(results.exec().unwrap().rows_affected(), 1);
    assert_eq!(results.exec().unwrap().rows_affected(), 1);
    let mut count = 0i64;
    results
        .query_row()
        .scan(&mut [ScanTarget::from(&mut count)])
        .unwrap();
    assert_eq!(count, 2);

    // The fourth read is out of the batch's range, not a ledger overrun.
    let err = results.query().err();
    assert_eq!(err, Some(SqlError::BatchExhausted { index: 3, len: 3 }));
    results.close().unwrap();

    recorder.query("SELECT 1", &[]).await.unwrap();
    assert!(recorder.take_failures().is_empty());
}

#[tokio::test]
async fn entry_errors_are_replayed_not_raised() {
    let recorder = SqlRecorder::new(vec![
        insert(1).err(SqlError::database("23505", "duplicate key")),
        SqlQuery::new("SELECT id FROM series").results(rows![[1i64], [2i64]]),
    ]);

    let mut batch = recorder.new_batch();
    batch.queue("INSERT INTO series (id) VALUES ($1)", &args![1i64]);
    batch.queue("SELECT id FROM series", &[]);
    let mut results = recorder.send_batch(batch).await.unwrap();

    assert_eq!(results.exec().unwrap_err().code(), Some("23505"));

    let mut rows = results.query().unwrap();
    let mut ids = Vec::new();
    while rows.next() {
        let mut id = 0i64;
        rows.scan(&mut [ScanTarget::from(&mut id)]).unwrap();
        ids.push(id);
    }
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn batch_past_ledger_end_reports_extra_queries() {
    let config = RecorderConfig {
        verify_on_drop: false,
        ..Default::default()
    };
    let recorder = SqlRecorder::with_config(vec![insert(1)], config);

    let mut batch = recorder.new_batch();
    batch.queue("INSERT INTO series (id) VALUES ($1)", &args![1i64]);
    batch.queue("INSERT INTO series (id) VALUES ($1)", &args![2i64]);
    let mut results = recorder.send_batch(batch).await.unwrap();

    assert!(matches!(
        recorder.take_failures()[..],
        [Failure::ExtraQuery { index: 1, .. }]
    ));
    assert!(results.exec().is_ok());
    assert!(matches!(
        results.exec(),
        Err(SqlError::BatchExhausted { index: 1, len: 1 })
    ));
}

#[tokio::test]
async fn batch_mismatches_are_reported_per_entry() {
    let config = RecorderConfig {
        verify_on_drop: false,
        ..Default::default()
    };
    let recorder = SqlRecorder::with_config(vec![insert(1), insert(2)], config);

    let mut batch = recorder.new_batch();
    batch.queue("INSERT INTO series (id) VALUES ($1)", &args![1i64]);
    batch.queue("INSERT INTO series (id) VALUES ($1)", &args![3i64]);
    recorder.send_batch(batch).await.unwrap();

    assert!(matches!(
        recorder.take_failures()[..],
        [Failure::ArgMismatch {
            index: 1,
            position: 0,
            ..
        }]
    ));
}

#[tokio::test]
async fn empty_batch_consumes_nothing() {
    let recorder = SqlRecorder::new(vec![SqlQuery::new("SELECT 1")]);

    let mut results = recorder.send_batch(recorder.new_batch()).await.unwrap();
    assert!(matches!(
        results.exec(),
        Err(SqlError::BatchExhausted { index: 0, len: 0 })
    ));
    assert_eq!(recorder.remaining(), 1);
    recorder.query("SELECT 1", &[]).await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_batches_consume_contiguous_slices() {
    const BATCHES: usize = 8;
    const BATCH_LEN: usize = 3;
    const DIRECT: usize = 8;
    let total = BATCHES * BATCH_LEN + DIRECT;

    // Every entry answers with its own ledger index.
    let sql = "INSERT INTO series (id) VALUES (DEFAULT)";
    let ledger = (0..total)
        .map(|i| SqlQuery::new(sql).tag(&format!("INSERT 0 {i}")))
        .collect();
    let recorder = Arc::new(SqlRecorder::new(ledger));

    let batches: Vec<_> = (0..BATCHES)
        .map(|_| {
            let recorder = recorder.clone();
            tokio::spawn(async move {
                let mut batch = recorder.new_batch();
                for _ in 0..BATCH_LEN {
                    batch.queue(sql, &[]);
                }
                let mut results = recorder.send_batch(batch).await.unwrap();
                (0..BATCH_LEN)
                    .map(|_| results.exec().unwrap().rows_affected())
                    .collect::<Vec<_>>()
            })
        })
        .collect();
    let direct: Vec<_> = (0..DIRECT)
        .map(|_| {
            let recorder = recorder.clone();
            tokio::spawn(async move { recorder.exec(sql, &[]).await.unwrap().rows_affected() })
        })
        .collect();

    let mut seen = Vec::new();
    for handle in batches {
        let indices = handle.await.unwrap();
        for pair in indices.windows(2) {
            assert_eq!(pair[1], pair[0] + 1, "batch slice not contiguous: {indices:?}");
        }
        seen.extend(indices);
    }
    for handle in direct {
        seen.push(handle.await.unwrap());
    }

    seen.sort_unstable();
    assert_eq!(seen, (0..total as u64).collect::<Vec<_>>());
    assert_eq!(recorder.remaining(), 0);
    assert!(recorder.take_failures().is_empty());
}
