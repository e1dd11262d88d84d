//! Wall-clock timestamps as stored in the gauge and log tables
//!
//! Timestamps are local time rendered as `YYYY-MM-DD HH:MM:SS`, the same
//! text the store has always held.

use chrono::{Local, NaiveDateTime};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn format(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text.trim(), TIMESTAMP_FORMAT).ok()
}

/// Whole days elapsed between `since` and `now`.
///
/// Empty or unparsable timestamps count as 0, and so do timestamps in the
/// future.
pub fn days_since(since: &str, now: NaiveDateTime) -> i64 {
    match parse(since) {
        Some(start) => (now - start).num_days().max(0),
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(text: &str) -> NaiveDateTime {
        parse(text).unwrap()
    }

    #[test]
    fn test_format_round_trip() {
        let t = at("2024-03-05 08:09:10");
        assert_eq!(format(t), "2024-03-05 08:09:10");
    }

    #[test]
    fn test_days_since() {
        let now = at("2024-03-10 12:00:00");
        assert_eq!(days_since("2024-03-10 11:00:00", now), 0);
        assert_eq!(days_since("2024-03-09 12:00:00", now), 1);
        assert_eq!(days_since("2024-03-08 12:00:01", now), 1);
        assert_eq!(days_since("2024-02-10 12:00:00", now), 29);
    }

    #[test]
    fn test_days_since_bad_input() {
        let now = at("2024-03-10 12:00:00");
        assert_eq!(days_since("", now), 0);
        assert_eq!(days_since("yesterday", now), 0);
        assert_eq!(days_since("2024-03-10", now), 0);
        assert_eq!(days_since("2024-03-11 12:00:00", now), 0);
    }
}
