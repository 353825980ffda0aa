//! Fixed `YYYY-MM-DD HH:MM:SS` representation used for stored record timestamps.
//!
//! Rows read back from the database go through [`truncate_to_seconds`], so a
//! fetched record carries whole-second precision regardless of what the
//! column stored.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::CoreError;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[must_use]
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, CoreError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|source| CoreError::Timestamp { value: value.to_owned(), source })
}

/// Round-trips `ts` through [`TIMESTAMP_FORMAT`], dropping sub-second precision.
pub fn truncate_to_seconds(ts: &DateTime<Utc>) -> Result<DateTime<Utc>, CoreError> {
    parse_timestamp(&format_timestamp(ts))
}

/// Serde adapter: writes [`TIMESTAMP_FORMAT`], reads it or RFC 3339.
pub mod serde_format {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{format_timestamp, parse_timestamp};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw)
            .or_else(|_| DateTime::parse_from_rfc3339(&raw).map(|ts| ts.with_timezone(&Utc)))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn formats_fixed_layout() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 1).unwrap();
        assert_eq!(format_timestamp(&ts), "2024-01-01 00:00:01");
    }

    #[test]
    fn parses_fixed_layout_as_utc() {
        let ts = parse_timestamp("2023-12-31 23:59:59").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap());
    }

    #[test]
    fn rejects_other_layouts() {
        let err = parse_timestamp("2024-01-01T00:00:01Z").unwrap_err();
        assert!(matches!(err, CoreError::Timestamp { ref value, .. } if value == "2024-01-01T00:00:01Z"));
    }

    #[test]
    fn truncation_drops_subseconds() {
        let ts = Utc.with_ymd_and_hms(2024, 6, 15, 12, 30, 45).unwrap()
            + chrono::Duration::microseconds(987_654);
        let truncated = truncate_to_seconds(&ts).unwrap();
        assert_eq!(truncated.nanosecond(), 0);
        assert_eq!(truncated, Utc.with_ymd_and_hms(2024, 6, 15, 12, 30, 45).unwrap());
    }
}
