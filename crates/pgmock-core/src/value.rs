//! Dynamically-typed values: statement arguments and canned result cells.
//!
//! A single closed [`Value`] enum covers every kind a ledger can declare.
//! Decoding into caller destinations matches on it exhaustively, so adding a
//! kind forces a decision about how it scans.

use std::fmt;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{CommandTag, SeriesEpoch, SeriesId};
use crate::utf8::{Utf8Text, Utf8TextArray};

/// A table of canned rows, as the database would have returned them.
pub type RowResults = Vec<Vec<Value>>;

/// A statement argument or a canned result cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    Null,
    Bool(bool),
    /// Platform-width integer.
    Int(isize),
    Int32(i32),
    Int64(i64),
    Uint8(u8),
    Uint32(u32),
    Uint64(u64),
    Float64(f64),
    String(String),
    Timestamp(DateTime<Utc>),
    Bytes(Bytes),
    TimestampArray(Vec<DateTime<Utc>>),
    Float64Array(Vec<f64>),
    Int64Array(Vec<i64>),
    Int32Array(Vec<i32>),
    StringArray(Vec<String>),
    SeriesIdArray(Vec<SeriesId>),
    Utf8Text(Utf8Text),
    Utf8TextArray(Utf8TextArray),
    CommandTag(CommandTag),
}

impl Value {
    /// Name of the value kind, as used in ledger files and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
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
            Self::TimestampArray(_) => "timestamp_array",
            Self::Float64Array(_) => "float64_array",
            Self::Int64Array(_) => "int64_array",
            Self::Int32Array(_) => "int32_array",
            Self::StringArray(_) => "string_array",
            Self::SeriesIdArray(_) => "series_id_array",
            Self::Utf8Text(_) => "utf8_text",
            Self::Utf8TextArray(_) => "utf8_text_array",
            Self::CommandTag(_) => "command_tag",
        }
    }

    /// The value's text-encoding capability, for kinds whose direct
    /// comparison is not stable.
    pub fn text_encoder(&self) -> Option<&dyn TextEncoder> {
        match self {
            Self::Utf8Text(t) => Some(t as &dyn TextEncoder),
            Self::Utf8TextArray(a) => Some(a as &dyn TextEncoder),
            _ => None,
        }
    }

    /// Elements of a sequence value, each as a scalar value.
    ///
    /// Returns `None` for scalars.
    pub fn elements(&self) -> Option<Vec<Value>> {
        let elements = match self {
            Self::Bytes(b) => b.iter().copied().map(Self::Uint8).collect(),
            Self::TimestampArray(v) => v.iter().copied().map(Self::Timestamp).collect(),
            Self::Float64Array(v) => v.iter().copied().map(Self::Float64).collect(),
            Self::Int64Array(v) => v.iter().copied().map(Self::Int64).collect(),
            Self::Int32Array(v) => v.iter().copied().map(Self::Int32).collect(),
            Self::StringArray(v) => v.iter().cloned().map(Self::String).collect(),
            Self::SeriesIdArray(v) => v.iter().map(|id| Self::Int64(id.get())).collect(),
            Self::Utf8TextArray(a) => a.iter().cloned().map(Self::Utf8Text).collect(),
            _ => return None,
        };
        Some(elements)
    }
}

/// Capability to render a value in its canonical text form.
pub trait TextEncoder {
    fn encode_text(&self) -> Result<String>;
}

/// Capability to build a value from a primitive value.
///
/// Wrapper types implement this so decoding can construct them from the
/// canned primitive instead of knowing their representation.
pub trait ValueSetter {
    fn set(&mut self, src: &Value) -> Result<()>;
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Int32(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::Uint8(v) => write!(f, "{v}"),
            Self::Uint32(v) => write!(f, "{v}"),
            Self::Uint64(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v:?}"),
            Self::Timestamp(v) => write!(f, "{}", v.to_rfc3339()),
            Self::Bytes(v) => write!(f, "\\x{}", hex::encode(v)),
            Self::TimestampArray(v) => {
                let items: Vec<String> = v.iter().map(|t| t.to_rfc3339()).collect();
                write!(f, "{items:?}")
            }
            Self::Float64Array(v) => write!(f, "{v:?}"),
            Self::Int64Array(v) => write!(f, "{v:?}"),
            Self::Int32Array(v) => write!(f, "{v:?}"),
            Self::StringArray(v) => write!(f, "{v:?}"),
            Self::SeriesIdArray(v) => write!(f, "{v:?}"),
            Self::Utf8Text(v) => write!(f, "{:?}", v.as_str()),
            Self::Utf8TextArray(v) => write!(f, "{v:?}"),
            Self::CommandTag(v) => write!(f, "{v:?}"),
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

impl_from! {
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
    Bytes => Bytes,
    Vec<DateTime<Utc>> => TimestampArray,
    Vec<f64> => Float64Array,
    Vec<i64> => Int64Array,
    Vec<i32> => Int32Array,
    Vec<String> => StringArray,
    Vec<SeriesId> => SeriesIdArray,
    Utf8Text => Utf8Text,
    Utf8TextArray => Utf8TextArray,
    CommandTag => CommandTag,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<Vec<&str>> for Value {
    fn from(v: Vec<&str>) -> Self {
        Self::StringArray(v.into_iter().map(str::to_owned).collect())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(Bytes::from(v))
    }
}

impl From<SeriesId> for Value {
    fn from(v: SeriesId) -> Self {
        Self::Int64(v.get())
    }
}

impl From<SeriesEpoch> for Value {
    fn from(v: SeriesEpoch) -> Self {
        Self::Int64(v.get())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Build a statement argument list from anything convertible to [`Value`].
///
/// ```
/// use pgmock_core::{args, Value};
///
/// let args = args!["cpu_usage", 7i64, true];
/// assert_eq!(args[1], Value::Int64(7));
/// ```
#[macro_export]
macro_rules! args {
    ($($arg:expr),* $(,)?) => {
        [$($crate::Value::from($arg)),*]
    };
}

/// Build a canned [`RowResults`] table, one bracketed group per row.
///
/// ```
/// use pgmock_core::{rows, Value};
///
/// let results = rows![[1i64, "a"], [2i64, "b"]];
/// assert_eq!(results.len(), 2);
/// assert_eq!(results[1][1], Value::from("b"));
/// ```
#[macro_export]
macro_rules! rows {
    ($([$($cell:expr),* $(,)?]),* $(,)?) => {
        vec![$(vec![$($crate::Value::from($cell)),*]),*]
    };
}
