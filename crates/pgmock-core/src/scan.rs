//! Decode destinations and the cursor traits a connection hands out.

use chrono::{DateTime, Utc};

use crate::error::{Result, SqlError};
use crate::types::{SeriesEpoch, SeriesId};
use crate::utf8::{Utf8Text, Utf8TextArray};
use crate::value::ValueSetter;

/// A caller-owned slot a column is decoded into.
///
/// Build one with `ScanTarget::from(&mut slot)` or `(&mut slot).into()`.
pub enum ScanTarget<'a> {
    /// Skip the column.
    Ignore,
    Bool(&'a mut bool),
    Int(&'a mut isize),
    Int32(&'a mut i32),
    Int64(&'a mut i64),
    Uint8(&'a mut u8),
    Uint32(&'a mut u32),
    Uint64(&'a mut u64),
    Float64(&'a mut f64),
    String(&'a mut String),
    Timestamp(&'a mut DateTime<Utc>),
    Bytes(&'a mut Vec<u8>),
    SeriesId(&'a mut SeriesId),
    SeriesEpoch(&'a mut SeriesEpoch),
    TimestampArray(&'a mut Vec<DateTime<Utc>>),
    Float64Array(&'a mut Vec<f64>),
    Int64Array(&'a mut Vec<i64>),
    Int32Array(&'a mut Vec<i32>),
    StringArray(&'a mut Vec<String>),
    SeriesIdArray(&'a mut Vec<SeriesId>),
    Utf8Text(&'a mut Utf8Text),
    Utf8TextArray(&'a mut Utf8TextArray),
    /// Any type that builds itself from a value.
    Setter(&'a mut dyn ValueSetter),
}

impl ScanTarget<'_> {
    /// Name of the destination kind, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Ignore => "ignore",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Int32(_) => "int32",
            Self::Int64(_) => "int64",
            Self::Uint8(_) => "uint8",
            Self::Uint32(_) => "uint32",
            Self::Uint64(_) => "uint64",
            Self::Float64(_) => "float64",
            Self::String(_) => "string",
            Self::Timestamp(_) => "timestamp",
            Self::Bytes(_) => "bytes",
            Self::SeriesId(_) => "series_id",
            Self::SeriesEpoch(_) => "series_epoch",
            Self::TimestampArray(_) => "timestamp_array",
            Self::Float64Array(_) => "float64_array",
            Self::Int64Array(_) => "int64_array",
            Self::Int32Array(_) => "int32_array",
            Self::StringArray(_) => "string_array",
            Self::SeriesIdArray(_) => "series_id_array",
            Self::Utf8Text(_) => "utf8_text",
            Self::Utf8TextArray(_) => "utf8_text_array",
            Self::Setter(_) => "value_setter",
        }
    }
}

macro_rules! impl_target_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl<'a> From<&'a mut $ty> for ScanTarget<'a> {
                fn from(slot: &'a mut $ty) -> Self {
                    Self::$variant(slot)
                }
            }
        )*
    };
}

impl_target_from! {
    bool => Bool,
    isize => Int,
    i32 => Int32,
    i64 => Int64,
    u8 => Uint8,
    u32 => Uint32,
    u64 => Uint64,
    f64 => Float64,
    String => String,
    DateTime<Utc> => Timestamp,
    Vec<u8> => Bytes,
    SeriesId => SeriesId,
    SeriesEpoch => SeriesEpoch,
    Vec<DateTime<Utc>> => TimestampArray,
    Vec<f64> => Float64Array,
    Vec<i64> => Int64Array,
    Vec<i32> => Int32Array,
    Vec<String> => StringArray,
    Vec<SeriesId> => SeriesIdArray,
    Utf8Text => Utf8Text,
    Utf8TextArray => Utf8TextArray,
}

/// Forward-only result iterator returned by a query.
///
/// `next` reports whether another row can be scanned; each `scan` call
/// consumes one row.
pub trait Rows: Send {
    fn next(&mut self) -> bool;

    fn scan(&mut self, dest: &mut [ScanTarget<'_>]) -> Result<()>;

    /// Any error that occurred while reading.
    fn err(&self) -> Option<SqlError>;

    fn close(&mut self);
}

/// Single-row result. Errors from the statement surface on `scan`.
pub trait Row: Send {
    fn scan(&mut self, dest: &mut [ScanTarget<'_>]) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_from_slot() {
        let mut id = SeriesId::default();
        let target = ScanTarget::from(&mut id);
        assert_eq!(target.kind(), "series_id");

        let mut names: Vec<String> = Vec::new();
        let target: ScanTarget<'_> = (&mut names).into();
        assert_eq!(target.kind(), "string_array");
    }
}
