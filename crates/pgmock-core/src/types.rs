//! Strong type definitions shared by the fakes.
//!
//! Identifiers are newtypes so a series id can never be confused with a
//! plain integer column at a call site.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned to a time-series by the ingestion layer.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesId(pub i64);

impl SeriesId {
    /// Wrap a raw database id.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw database id.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Debug for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SeriesId({})", self.0)
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for SeriesId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Epoch of the series cache; ids handed out before an epoch bump are stale.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesEpoch(pub i64);

impl SeriesEpoch {
    pub const fn new(epoch: i64) -> Self {
        Self(epoch)
    }

    pub const fn get(self) -> i64 {
        self.0
    }

    /// True if `self` is strictly newer than `other`.
    pub fn after(self, other: SeriesEpoch) -> bool {
        self.0 > other.0
    }
}

impl fmt::Debug for SeriesEpoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SeriesEpoch({})", self.0)
    }
}

impl From<i64> for SeriesEpoch {
    fn from(epoch: i64) -> Self {
        Self(epoch)
    }
}

/// Completion tag the server sends back for a statement, e.g. `INSERT 0 3`.
///
/// The empty tag stands in for "no tag" when an exec result is unusable.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandTag(String);

impl CommandTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of rows the statement touched: the trailing integer of the tag,
    /// or zero when the tag carries none.
    pub fn rows_affected(&self) -> u64 {
        self.0
            .rsplit(' ')
            .next()
            .and_then(|n| n.parse().ok())
            .unwrap_or(0)
    }

    pub fn is_insert(&self) -> bool {
        self.0.starts_with("INSERT")
    }

    pub fn is_update(&self) -> bool {
        self.0.starts_with("UPDATE")
    }

    pub fn is_delete(&self) -> bool {
        self.0.starts_with("DELETE")
    }

    pub fn is_select(&self) -> bool {
        self.0.starts_with("SELECT")
    }
}

impl fmt::Debug for CommandTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommandTag({:?})", self.0)
    }
}

impl fmt::Display for CommandTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CommandTag {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}
