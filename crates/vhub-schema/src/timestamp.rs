//! Lenient timestamp parsing for persisted records.
//!
//! Current files store RFC 3339 strings. Older files may carry local
//! timestamps without an offset; those are read as UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

pub fn parse(input: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Some(ts.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(|naive| naive.and_utc())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'")))
}

/// Convert a Unix timestamp in milliseconds, clamping out-of-range values to
/// the epoch.
pub fn from_unix_millis(ms: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(ms).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339_with_offset() {
        let ts = parse("2024-05-01T18:00:00+08:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-05-01T10:00:00+00:00");
    }

    #[test]
    fn parses_naive_as_utc() {
        let ts = parse("2024-05-01T10:00:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-05-01T10:00:00+00:00");
        assert!(parse("2024-05-01 10:00:00.5").is_some());
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse("yesterday").is_none());
    }

    #[test]
    fn unix_millis_conversion() {
        let ts = from_unix_millis(1_700_000_000_000);
        assert_eq!(ts.timestamp(), 1_700_000_000);
        assert_eq!(from_unix_millis(0), DateTime::<Utc>::UNIX_EPOCH);
    }
}
