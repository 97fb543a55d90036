//! Time and timestamp helpers.

use chrono::{DateTime, Utc};

/// UTC timestamp used for the server start time.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Seconds since the Unix epoch, with millisecond precision.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn epoch_seconds(ts: Timestamp) -> f64 {
    ts.timestamp_millis() as f64 / 1000.0
}
