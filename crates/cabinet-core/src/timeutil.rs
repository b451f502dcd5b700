//! Calendar helpers for consultation derivation.
//!
//! "Today" is always injected by callers so the derivations stay
//! deterministic under test; this module only supplies parsing and the
//! day-truncation primitive they share.

use chrono::{DateTime, NaiveTime, Utc};

/// Parse an RFC 3339 timestamp, normalizing to UTC. Returns None for
/// malformed input - read paths are best-effort.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Truncate an instant to the start of its UTC calendar day.
pub fn start_of_day(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant.date_naive().and_time(NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_instant() {
        let parsed = parse_instant("2024-03-15T14:30:00Z").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-03-15T14:30:00+00:00");
    }

    #[test]
    fn test_parse_instant_offset_normalized() {
        let parsed = parse_instant("2024-03-15T14:30:00+02:00").unwrap();
        assert_eq!(parsed, parse_instant("2024-03-15T12:30:00Z").unwrap());
    }

    #[test]
    fn test_parse_instant_malformed() {
        assert!(parse_instant("15/03/2024").is_none());
        assert!(parse_instant("").is_none());
    }

    #[test]
    fn test_start_of_day() {
        let instant = parse_instant("2024-03-15T14:30:59Z").unwrap();
        let day = start_of_day(instant);
        assert_eq!(day, parse_instant("2024-03-15T00:00:00Z").unwrap());
        // Idempotent
        assert_eq!(start_of_day(day), day);
    }
}
