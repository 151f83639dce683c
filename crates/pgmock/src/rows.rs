//! Row cursor over a canned result table.
//!
//! Each column is decoded according to the kind of the canned value, the way
//! a real driver dispatches on the wire type:
//!
//! | Canned value | Destinations |
//! |---|---|
//! | `timestamp_array`, `float64_array` | matching array, or any [`ValueSetter`] |
//! | `int64_array` | `Vec<i64>`, or `Vec<SeriesId>` (each element wrapped) |
//! | `series_id_array` | `Vec<SeriesId>`, or `Vec<i64>` |
//! | `int32_array`, `bytes` | matching array |
//! | `string_array` | `Vec<String>`, or [`Utf8TextArray`] |
//! | scalars | matching scalar slot |
//! | `int64` | `i64`, [`SeriesId`] or [`SeriesEpoch`] |
//! | `string` | `String`, or [`Utf8Text`] |
//!
//! Any other pairing is a [`SqlError::WrongType`]. Canned kinds with no decode
//! rule at all panic: the ledger asked for something the fake cannot do.
//!
//! [`SeriesEpoch`]: pgmock_core::SeriesEpoch

use pgmock_core::{
    Result, Row, RowResults, Rows, ScanTarget, SeriesEpoch, SeriesId, SqlError, Utf8Text,
    Utf8TextArray, Value, ValueSetter,
};

/// Forward-only cursor over canned rows.
///
/// `next` never advances; each `scan` consumes one row, and the position
/// stops at the end of the table.
#[derive(Debug, Clone, Default)]
pub struct MockRows {
    idx: usize,
    /// Report no rows even when some remain.
    no_next: bool,
    results: RowResults,
    err: Option<SqlError>,
}

impl MockRows {
    pub fn new(results: RowResults) -> Self {
        Self {
            results,
            ..Self::default()
        }
    }

    /// A cursor carrying a statement error. The error suppresses iteration
    /// and is returned by every `scan`.
    pub fn with_error(results: RowResults, err: Option<SqlError>) -> Self {
        Self {
            idx: 0,
            no_next: err.is_some(),
            results,
            err,
        }
    }

    /// Index of the next row to scan.
    pub fn position(&self) -> usize {
        self.idx
    }

    fn decode_row(&mut self, dest: &mut [ScanTarget<'_>]) -> Result<()> {
        let position = self.idx;
        self.idx = (self.idx + 1).min(self.results.len());

        if let Some(err) = &self.err {
            return Err(err.clone());
        }

        let row = self.results.get(position).ok_or(SqlError::NoMoreRows {
            position,
            len: self.results.len(),
        })?;

        if dest.len() > row.len() {
            return Err(SqlError::MissingColumns {
                got: row.len(),
                wanted: dest.len(),
            });
        }

        for (column, (value, target)) in row.iter().zip(dest.iter_mut()).enumerate() {
            tracing::trace!(column, value = value.kind(), target = target.kind(), "scan column");
            decode(column, value, target)?;
        }
        Ok(())
    }
}

impl Rows for MockRows {
    fn next(&mut self) -> bool {
        !self.no_next && self.idx < self.results.len()
    }

    fn scan(&mut self, dest: &mut [ScanTarget<'_>]) -> Result<()> {
        self.decode_row(dest)
    }

    fn err(&self) -> Option<SqlError> {
        self.err.clone()
    }

    fn close(&mut self) {}
}

impl Row for MockRows {
    fn scan(&mut self, dest: &mut [ScanTarget<'_>]) -> Result<()> {
        self.decode_row(dest)
    }
}

fn wrong_type(column: usize, value: &Value, target: &ScanTarget<'_>) -> SqlError {
    SqlError::WrongType {
        column,
        value: value.kind().to_owned(),
        target: target.kind().to_owned(),
    }
}

/// Copy one canned value into its destination.
fn decode(column: usize, value: &Value, target: &mut ScanTarget<'_>) -> Result<()> {
    if let ScanTarget::Ignore = target {
        return Ok(());
    }

    match value {
        Value::TimestampArray(v) => match target {
            ScanTarget::TimestampArray(d) => **d = v.clone(),
            ScanTarget::Setter(d) => d.set(value)?,
            other => return Err(wrong_type(column, value, other)),
        },
        Value::Float64Array(v) => match target {
            ScanTarget::Float64Array(d) => **d = v.clone(),
            ScanTarget::Setter(d) => d.set(value)?,
            other => return Err(wrong_type(column, value, other)),
        },
        Value::Int64Array(v) => match target {
            ScanTarget::Int64Array(d) => **d = v.clone(),
            ScanTarget::SeriesIdArray(d) => **d = v.iter().copied().map(SeriesId::new).collect(),
            other => return Err(wrong_type(column, value, other)),
        },
        Value::SeriesIdArray(v) => match target {
            ScanTarget::SeriesIdArray(d) => **d = v.clone(),
            ScanTarget::Int64Array(d) => **d = v.iter().map(|id| id.get()).collect(),
            other => return Err(wrong_type(column, value, other)),
        },
        Value::Int32Array(v) => match target {
            ScanTarget::Int32Array(d) => **d = v.clone(),
            other => return Err(wrong_type(column, value, other)),
        },
        Value::Bytes(v) => match target {
            ScanTarget::Bytes(d) => **d = v.to_vec(),
            other => return Err(wrong_type(column, value, other)),
        },
        Value::StringArray(v) => match target {
            ScanTarget::StringArray(d) => **d = v.clone(),
            ScanTarget::Utf8TextArray(d) => {
                let mut array = Utf8TextArray::default();
                array.set(value)?;
                **d = array;
            }
            other => return Err(wrong_type(column, value, other)),
        },
        Value::Timestamp(v) => match target {
            ScanTarget::Timestamp(d) => **d = *v,
            other => return Err(wrong_type(column, value, other)),
        },
        Value::Float64(v) => match target {
            ScanTarget::Float64(d) => **d = *v,
            other => return Err(wrong_type(column, value, other)),
        },
        Value::Int(v) => match target {
            ScanTarget::Int(d) => **d = *v,
            other => return Err(wrong_type(column, value, other)),
        },
        Value::Bool(v) => match target {
            ScanTarget::Bool(d) => **d = *v,
            other => return Err(wrong_type(column, value, other)),
        },
        Value::Int32(v) => match target {
            ScanTarget::Int32(d) => **d = *v,
            other => return Err(wrong_type(column, value, other)),
        },
        Value::Uint32(v) => match target {
            ScanTarget::Uint32(d) => **d = *v,
            other => return Err(wrong_type(column, value, other)),
        },
        Value::Uint8(v) => match target {
            ScanTarget::Uint8(d) => **d = *v,
            other => return Err(wrong_type(column, value, other)),
        },
        Value::Uint64(v) => match target {
            ScanTarget::Uint64(d) => **d = *v,
            other => return Err(wrong_type(column, value, other)),
        },
        Value::Int64(v) => match target {
            ScanTarget::Int64(d) => **d = *v,
            ScanTarget::SeriesId(d) => **d = SeriesId::new(*v),
            ScanTarget::SeriesEpoch(d) => **d = SeriesEpoch::new(*v),
            other => return Err(wrong_type(column, value, other)),
        },
        Value::String(v) => match target {
            ScanTarget::String(d) => **d = v.clone(),
            ScanTarget::Utf8Text(d) => {
                let mut text = Utf8Text::default();
                text.set(value)?;
                **d = text;
            }
            other => return Err(wrong_type(column, value, other)),
        },
        Value::Null
        | Value::Utf8Text(_)
        | Value::Utf8TextArray(_)
        | Value::CommandTag(_) => {
            panic!("unhandled canned value kind {} in column {column}", value.kind())
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use pgmock_core::rows;

    #[derive(Default)]
    struct Samples(Vec<f64>);

    impl ValueSetter for Samples {
        fn set(&mut self, src: &Value) -> Result<()> {
            match src {
                Value::Float64Array(v) => {
                    self.0 = v.iter().map(|f| f * 2.0).collect();
                    Ok(())
                }
                other => Err(SqlError::conversion(other.kind())),
            }
        }
    }

    #[test]
    fn test_next_does_not_advance() {
        let mut rows = MockRows::new(rows![[1i64], [2i64]]);
        assert!(Rows::next(&mut rows));
        assert!(Rows::next(&mut rows));
        assert_eq!(rows.position(), 0);

        let mut a = 0i64;
        Rows::scan(&mut rows, &mut [ScanTarget::from(&mut a)]).unwrap();
        assert_eq!(a, 1);
        Rows::scan(&mut rows, &mut [ScanTarget::from(&mut a)]).unwrap();
        assert_eq!(a, 2);
        assert!(!Rows::next(&mut rows));
    }

    #[test]
    fn test_scan_past_end() {
        let mut rows = MockRows::new(rows![[1i64]]);
        let mut a = 0i64;
        Rows::scan(&mut rows, &mut [(&mut a).into()]).unwrap();

        for _ in 0..2 {
            let err = Rows::scan(&mut rows, &mut [(&mut a).into()]).unwrap_err();
            assert_eq!(err, SqlError::NoMoreRows { position: 1, len: 1 });
            assert_eq!(rows.position(), 1);
        }
    }

    #[test]
    fn test_missing_columns() {
        let mut rows = MockRows::new(rows![[1i64]]);
        let (mut a, mut b) = (0i64, 0i64);
        let err = Rows::scan(&mut rows, &mut [(&mut a).into(), (&mut b).into()]).unwrap_err();
        assert_eq!(err, SqlError::MissingColumns { got: 1, wanted: 2 });
    }

    #[test]
    fn test_fewer_destinations_than_columns() {
        let mut rows = MockRows::new(rows![[1i64, "extra"]]);
        let mut a = 0i64;
        Rows::scan(&mut rows, &mut [(&mut a).into()]).unwrap();
        assert_eq!(a, 1);
    }

    #[test]
    fn test_error_suppresses_rows() {
        let err = SqlError::database("57014", "canceling statement");
        let mut rows = MockRows::with_error(rows![[1i64]], Some(err.clone()));
        assert!(!Rows::next(&mut rows));
        assert_eq!(Rows::err(&rows), Some(err.clone()));

        let mut a = 0i64;
        assert_eq!(Row::scan(&mut rows, &mut [(&mut a).into()]), Err(err));
        assert_eq!(a, 0);
    }

    #[test]
    fn test_int64_array_into_series_ids() {
        let mut rows = MockRows::new(rows![[vec![10i64, 20]]]);
        let mut ids: Vec<SeriesId> = vec![SeriesId::new(99)];
        Rows::scan(&mut rows, &mut [(&mut ids).into()]).unwrap();
        assert_eq!(ids, vec![SeriesId::new(10), SeriesId::new(20)]);
    }

    #[test]
    fn test_series_id_array_scans_back() {
        let ids = vec![SeriesId::new(3), SeriesId::new(4)];
        let mut rows = MockRows::new(rows![[ids.clone(), ids.clone()]]);
        let mut got: Vec<SeriesId> = Vec::new();
        let mut raw: Vec<i64> = Vec::new();
        Rows::scan(&mut rows, &mut [(&mut got).into(), (&mut raw).into()]).unwrap();
        assert_eq!(got, ids);
        assert_eq!(raw, vec![3, 4]);
    }

    #[test]
    fn test_int64_scalar_targets() {
        let mut rows = MockRows::new(rows![[5i64, 6i64, 7i64]]);
        let mut raw = 0i64;
        let mut id = SeriesId::default();
        let mut epoch = SeriesEpoch::default();
        Rows::scan(
            &mut rows,
            &mut [(&mut raw).into(), (&mut id).into(), (&mut epoch).into()],
        )
        .unwrap();
        assert_eq!((raw, id, epoch), (5, SeriesId::new(6), SeriesEpoch::new(7)));
    }

    #[test]
    fn test_scalar_kinds() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let mut rows = MockRows::new(vec![vec![
            Value::Timestamp(ts),
            Value::Float64(1.5),
            Value::Int(-3),
            Value::Bool(true),
            Value::Int32(7),
            Value::Uint32(8),
            Value::Uint8(9),
            Value::Uint64(10),
        ]]);

        let mut t = Utc.timestamp_opt(0, 0).unwrap();
        let (mut f, mut i, mut b) = (0.0f64, 0isize, false);
        let (mut i32v, mut u32v, mut u8v, mut u64v) = (0i32, 0u32, 0u8, 0u64);
        Rows::scan(
            &mut rows,
            &mut [
                (&mut t).into(),
                (&mut f).into(),
                (&mut i).into(),
                (&mut b).into(),
                (&mut i32v).into(),
                (&mut u32v).into(),
                (&mut u8v).into(),
                (&mut u64v).into(),
            ],
        )
        .unwrap();

        assert_eq!(t, ts);
        assert_eq!((f, i, b), (1.5, -3, true));
        assert_eq!((i32v, u32v, u8v, u64v), (7, 8, 9, 10));
    }

    #[test]
    fn test_sequence_kinds() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let mut rows = MockRows::new(vec![vec![
            Value::TimestampArray(vec![ts]),
            Value::Float64Array(vec![0.5]),
            Value::Int32Array(vec![1, 2]),
            Value::from(vec![0xabu8]),
            Value::from(vec!["a", "b"]),
        ]]);

        let mut times: Vec<DateTime<Utc>> = Vec::new();
        let mut floats: Vec<f64> = Vec::new();
        let mut ints: Vec<i32> = Vec::new();
        let mut bytes: Vec<u8> = Vec::new();
        let mut strings: Vec<String> = Vec::new();
        Rows::scan(
            &mut rows,
            &mut [
                (&mut times).into(),
                (&mut floats).into(),
                (&mut ints).into(),
                (&mut bytes).into(),
                (&mut strings).into(),
            ],
        )
        .unwrap();

        assert_eq!(times, vec![ts]);
        assert_eq!(floats, vec![0.5]);
        assert_eq!(ints, vec![1, 2]);
        assert_eq!(bytes, vec![0xab]);
        assert_eq!(strings, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_setter_destination() {
        let mut rows = MockRows::new(rows![[vec![1.0f64, 2.0]]]);
        let mut samples = Samples::default();
        Rows::scan(&mut rows, &mut [ScanTarget::Setter(&mut samples)]).unwrap();
        assert_eq!(samples.0, vec![2.0, 4.0]);
    }

    #[test]
    fn test_utf8_wrappers() {
        let mut rows = MockRows::new(rows![["a\0b", vec!["x", "y"]]]);
        let mut text = Utf8Text::default();
        let mut array = Utf8TextArray::default();
        Rows::scan(&mut rows, &mut [(&mut text).into(), (&mut array).into()]).unwrap();
        assert_eq!(text.as_str(), "a\u{FFFE}b");
        assert_eq!(array.to_strings(), vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn test_wrong_type() {
        let mut rows = MockRows::new(rows![["name"]]);
        let mut n = 0i64;
        let err = Rows::scan(&mut rows, &mut [(&mut n).into()]).unwrap_err();
        assert_eq!(
            err,
            SqlError::WrongType {
                column: 0,
                value: "string".into(),
                target: "int64".into(),
            }
        );
    }

    #[test]
    fn test_ignore_skips_column() {
        let mut rows = MockRows::new(rows![[1i64, "b"]]);
        let mut b = String::new();
        Rows::scan(&mut rows, &mut [ScanTarget::Ignore, (&mut b).into()]).unwrap();
        assert_eq!(b, "b");
    }

    #[test]
    #[should_panic(expected = "unhandled canned value kind null")]
    fn test_unhandled_kind_panics() {
        let mut rows = MockRows::new(vec![vec![Value::Null]]);
        let mut s = String::new();
        let _ = Rows::scan(&mut rows, &mut [(&mut s).into()]);
    }
}
