//! Timestamp utilities

use chrono::{DateTime, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Milliseconds since the Unix epoch, used for generated ids and file names
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Current time as an ISO-8601 string with millisecond precision (`dateAdded` format)
pub fn now_iso() -> String {
    to_iso(now())
}

/// Format a timestamp the way catalog records store `dateAdded`
pub fn to_iso(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
