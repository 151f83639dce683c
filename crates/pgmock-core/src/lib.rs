//! # pgmock Core
//!
//! The value model shared by the pgmock fakes: dynamically-typed values,
//! domain wrapper types, decode destinations and cursor traits.
//!
//! This crate contains no I/O and no locking. It is pure data.
//!
//! ## Key Types
//!
//! - [`Value`] - A statement argument or a canned result cell
//! - [`RowResults`] - A canned table of rows
//! - [`ScanTarget`] - A caller-owned decode destination
//! - [`Rows`] / [`Row`] - Cursor traits handed out by a connection
//! - [`SqlError`] - The error a driver call returns
//! - [`SeriesId`], [`SeriesEpoch`], [`CommandTag`], [`Utf8Text`], [`Utf8TextArray`]

pub mod error;
pub mod scan;
pub mod types;
pub mod utf8;
pub mod value;

pub use error::{Result, SqlError};
pub use scan::{Row, Rows, ScanTarget};
pub use types::{CommandTag, SeriesEpoch, SeriesId};
pub use utf8::{sanitize, Utf8Text, Utf8TextArray, NULL_CHAR_SANITIZE};
pub use value::{RowResults, TextEncoder, Value, ValueSetter};
