//! Time helpers
//!
//! Parsing for the `HH:MM` / `YYYY-MM-DD` wire formats and
//! timezone-aware "now" used by availability and coupon checks.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Timelike, Utc, Weekday};
use chrono_tz::Tz;

/// Parse an IANA timezone name, e.g. "Europe/Madrid"
pub fn parse_timezone(name: &str) -> Option<Tz> {
    name.parse::<Tz>().ok()
}

/// Parse a wall-clock time in `HH:MM` format
pub fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}

/// Parse a calendar date in `YYYY-MM-DD` format
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Minutes since midnight for an `HH:MM` string
pub fn minutes_of_day(value: &str) -> Option<u32> {
    let t = parse_hhmm(value)?;
    Some(t.hour() * 60 + t.minute())
}

/// Format minutes since midnight back to `HH:MM`
pub fn format_minutes(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Weekday index with Sunday = 0, matching the stored operating-hours layout
pub fn weekday_index(date: NaiveDate) -> u8 {
    match date.weekday() {
        Weekday::Sun => 0,
        Weekday::Mon => 1,
        Weekday::Tue => 2,
        Weekday::Wed => 3,
        Weekday::Thu => 4,
        Weekday::Fri => 5,
        Weekday::Sat => 6,
    }
}

/// Current date and minutes-of-day in the given timezone
pub fn local_now(tz: Tz) -> (NaiveDate, u32) {
    let now: DateTime<Tz> = Utc::now().with_timezone(&tz);
    (now.date_naive(), now.hour() * 60 + now.minute())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hhmm() {
        assert_eq!(minutes_of_day("00:00"), Some(0));
        assert_eq!(minutes_of_day("09:30"), Some(570));
        assert_eq!(minutes_of_day("23:59"), Some(1439));
        assert_eq!(minutes_of_day("24:00"), None);
        assert_eq!(minutes_of_day("9:3"), None);
    }

    #[test]
    fn test_format_minutes_round_trip() {
        for value in ["06:00", "18:45", "00:15"] {
            assert_eq!(format_minutes(minutes_of_day(value).unwrap()), value);
        }
    }

    #[test]
    fn test_weekday_index_sunday_based() {
        // 2026-08-02 is a Sunday
        let sunday = parse_date("2026-08-02").unwrap();
        assert_eq!(weekday_index(sunday), 0);
        assert_eq!(weekday_index(sunday.succ_opt().unwrap()), 1);
    }

    #[test]
    fn test_parse_timezone() {
        assert!(parse_timezone("Europe/Madrid").is_some());
        assert!(parse_timezone("Mars/Olympus").is_none());
    }
}
