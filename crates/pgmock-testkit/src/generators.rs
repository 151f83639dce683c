//! Proptest generators for property-based testing.

use proptest::prelude::*;

use pgmock::SqlQuery;
use pgmock_core::{SeriesId, Value};
use pgmock_ingest::{Insertable, Sample, Series};

/// A scalar argument value.
pub fn scalar_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(Value::Int32),
        any::<i64>().prop_map(Value::Int64),
        any::<u64>().prop_map(Value::Uint64),
        "[a-z0-9_]{0,12}".prop_map(Value::String),
    ]
}

/// A sequence argument value.
pub fn array_value(max_len: usize) -> impl Strategy<Value = Value> {
    prop_oneof![
        prop::collection::vec(any::<i64>(), 0..=max_len).prop_map(Value::Int64Array),
        prop::collection::vec(any::<i32>(), 0..=max_len).prop_map(Value::Int32Array),
        prop::collection::vec("[a-z]{1,6}", 0..=max_len).prop_map(Value::StringArray),
    ]
}

/// Any argument value the matcher compares structurally.
pub fn arg_value() -> impl Strategy<Value = Value> {
    prop_oneof![scalar_value(), array_value(8)]
}

/// An int64 array and a shuffled copy of it.
pub fn permuted_int64s(max_len: usize) -> impl Strategy<Value = (Vec<i64>, Vec<i64>)> {
    prop::collection::vec(-100i64..100, 1..=max_len).prop_flat_map(|values| {
        let original = values.clone();
        Just(values)
            .prop_shuffle()
            .prop_map(move |shuffled| (original.clone(), shuffled))
    })
}

/// A single-line statement with single spaces between tokens.
pub fn statement() -> impl Strategy<Value = String> {
    prop::collection::vec("[A-Za-z_][A-Za-z0-9_]{0,8}|\\$[1-9]|[=,*()]", 1..12)
        .prop_map(|tokens| tokens.join(" "))
}

/// A statement and a copy whose single spaces became whitespace runs.
pub fn whitespace_variant() -> impl Strategy<Value = (String, String)> {
    statement().prop_flat_map(|sql| {
        let gaps = sql.matches(' ').count();
        let runs = prop::collection::vec("[ \t\n]{1,4}", gaps..=gaps);
        (Just(sql), runs).prop_map(|(sql, runs)| {
            let mut variant = String::with_capacity(sql.len() * 2);
            let mut runs = runs.into_iter().peekable();
            for c in sql.chars() {
                match (c, runs.next_if(|_| c == ' ')) {
                    (_, Some(run)) => variant.push_str(&run),
                    (c, None) => variant.push(c),
                }
            }
            (sql, variant)
        })
    })
}

/// A ledger entry with ordered arguments and no canned response.
pub fn ledger_entry() -> impl Strategy<Value = SqlQuery> {
    (statement(), prop::collection::vec(arg_value(), 0..4))
        .prop_map(|(sql, args)| SqlQuery::new(sql).args(args))
}

/// A ledger of up to `max_len` entries.
pub fn ledger(max_len: usize) -> impl Strategy<Value = Vec<SqlQuery>> {
    prop::collection::vec(ledger_entry(), 0..=max_len)
}

/// A label set of up to three labels.
pub fn labels() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(("[a-z]{1,5}", "[a-z0-9]{1,5}"), 0..=3)
}

/// A sample row for one of a few metric names, so series repeat.
pub fn sample_row() -> impl Strategy<Value = Insertable> {
    (
        prop::sample::select(vec!["cpu", "mem", "disk"]),
        labels(),
        prop::collection::vec((0i64..1_000_000, -1e6f64..1e6), 1..5),
    )
        .prop_map(|(metric, labels, points)| {
            let samples = points
                .into_iter()
                .map(|(timestamp_ms, value)| Sample {
                    timestamp_ms,
                    value,
                })
                .collect();
            Insertable::samples(Series::new(metric, labels), samples)
        })
}

/// A series id in the range an inserter assigns from.
pub fn series_id() -> impl Strategy<Value = SeriesId> {
    (0i64..10_000).prop_map(SeriesId::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pgmock::ledger::normalize;

    proptest! {
        #[test]
        fn test_whitespace_variant_normalizes((sql, variant) in whitespace_variant()) {
            prop_assert_eq!(normalize(&variant), sql);
        }

        #[test]
        fn test_permuted_is_permutation((original, shuffled) in permuted_int64s(16)) {
            let mut a = original.clone();
            let mut b = shuffled.clone();
            a.sort_unstable();
            b.sort_unstable();
            prop_assert_eq!(a, b);
        }

        #[test]
        fn test_array_value_has_elements(value in array_value(4)) {
            prop_assert!(value.elements().is_some());
        }
    }
}
