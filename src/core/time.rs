//! Time helpers - the store keeps timestamps as integer microseconds

use chrono::{DateTime, Utc};

/// Current instant, truncated to the precision the store keeps
pub fn now() -> DateTime<Utc> {
    from_micros(Utc::now().timestamp_micros())
}

pub fn to_micros(ts: &DateTime<Utc>) -> i64 {
    ts.timestamp_micros()
}

pub fn from_micros(micros: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_micros(micros).unwrap_or_default()
}
