//! Timestamp parsing utilities

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601 timestamp as a naive date-time
///
/// A trailing `Z` is stripped. A value carrying an explicit offset is
/// converted to its UTC wall time. A bare date maps to midnight.
pub fn parse_naive_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    let value = trimmed.strip_suffix('Z').unwrap_or(trimmed);

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .or_else(|| DateTime::parse_from_rfc3339(trimmed).ok().map(|dt| dt.naive_utc()))
}

/// Parse an ISO-8601 timestamp into UTC
///
/// RFC 3339 values with any offset are normalized to UTC; naive values
/// are taken to already be UTC.
pub fn parse_utc_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| parse_naive_timestamp(trimmed).map(|naive| naive.and_utc()))
}
