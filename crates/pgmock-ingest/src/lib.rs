//! # pgmock Ingest
//!
//! Fakes for the ingest path's collaborators: the metric-name cache and the
//! data inserter.
//!
//! ## Key Types
//!
//! - [`MetricCache`] / [`Inserter`] - The interfaces being faked
//! - [`MockMetricCache`] - Keyed lookup with injectable get/set errors
//! - [`MockInserter`] - Assigns series ids, counts points, injectable errors
//! - [`Data`], [`Insertable`], [`Series`] - What an inserter receives
//!
//! ## Usage
//!
//! ```rust
//! use chrono::Utc;
//! use pgmock_ingest::{Data, Inserter, Insertable, MockInserter, Sample, Series};
//!
//! let mut inserter = MockInserter::new();
//! let mut data = Data::new(Utc::now());
//! data.push(Insertable::samples(
//!     Series::new("cpu", [("job", "api")]),
//!     vec![Sample { timestamp_ms: 1, value: 0.5 }],
//! ));
//!
//! assert_eq!(inserter.insert_ts(&mut data).unwrap(), 1);
//! ```
//!
//! Neither fake locks. Each belongs to the one test flow that built it.

pub mod cache;
pub mod error;
pub mod inserter;
pub mod model;
pub mod traits;

pub use cache::{MetricKey, MockMetricCache};
pub use error::{IngestError, Result};
pub use inserter::MockInserter;
pub use model::{Data, Exemplar, Insertable, Metadata, MetricInfo, Payload, Sample, Series};
pub use traits::{Inserter, MetricCache};
