//! # Timestamp Value Object
//!
//! UTC point in time used for every audit column of the aggregator
//! (`created_at`, `updated_at`, `submitted_at`, `completed_at`).
//!
//! # Examples
//!
//! ```
//! use offer_aggregator::domain::value_objects::Timestamp;
//!
//! let submitted = Timestamp::from_secs(1_767_225_600).unwrap();
//! assert_eq!(submitted.to_string(), "2026-01-01T00:00:00+00:00");
//! assert!(Timestamp::now() > submitted);
//! ```

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A UTC timestamp, serialized as RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// From Unix milliseconds; `None` when out of range.
    #[must_use]
    pub fn from_millis(millis: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(millis).single().map(Self)
    }

    /// From Unix seconds; `None` when out of range.
    #[must_use]
    pub fn from_secs(secs: i64) -> Option<Self> {
        Utc.timestamp_opt(secs, 0).single().map(Self)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}
