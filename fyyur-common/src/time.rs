//! Show timing utilities
//!
//! Start times are naive local timestamps. A show is classified against the
//! current instant on every read; nothing about the classification is stored.

use chrono::{Local, NaiveDateTime};
use std::cmp::Ordering;

/// Display pattern for show start times: `month/day/year, hour:minute:second`
pub const START_TIME_FORMAT: &str = "%m/%d/%Y, %H:%M:%S";

/// Accepted submission patterns for show start times
const INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Get the current local time as a naive timestamp
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Format a start time for display
pub fn format_start_time(start_time: &NaiveDateTime) -> String {
    start_time.format(START_TIME_FORMAT).to_string()
}

/// Parse a submitted start time, returning None if no accepted pattern matches
pub fn parse_start_time(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
}

/// Position of a show relative to the query instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowTiming {
    /// Starts strictly after now
    Upcoming,
    /// Started strictly before now
    Past,
    /// Starts exactly now; counted as neither upcoming nor past
    Now,
}

/// Classify a start time against `now`
pub fn classify(start_time: &NaiveDateTime, now: &NaiveDateTime) -> ShowTiming {
    match start_time.cmp(now) {
        Ordering::Greater => ShowTiming::Upcoming,
        Ordering::Less => ShowTiming::Past,
        Ordering::Equal => ShowTiming::Now,
    }
}

/// Split timed entries into (upcoming, past), dropping those exactly at `now`
pub fn split_upcoming_past<T>(
    entries: impl IntoIterator<Item = (NaiveDateTime, T)>,
    now: &NaiveDateTime,
) -> (Vec<T>, Vec<T>) {
    let mut upcoming = Vec::new();
    let mut past = Vec::new();

    for (start_time, entry) in entries {
        match classify(&start_time, now) {
            ShowTiming::Upcoming => upcoming.push(entry),
            ShowTiming::Past => past.push(entry),
            ShowTiming::Now => {}
        }
    }

    (upcoming, past)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn at(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(hour, minute, second)
            .unwrap()
    }

    #[test]
    fn test_format_is_zero_padded_24_hour() {
        assert_eq!(format_start_time(&at(21, 5, 9)), "03/07/2024, 21:05:09");
        assert_eq!(format_start_time(&at(0, 0, 0)), "03/07/2024, 00:00:00");
    }

    #[test]
    fn test_parse_accepts_space_and_t_separators() {
        assert_eq!(parse_start_time("2024-03-07 21:05:09"), Some(at(21, 5, 9)));
        assert_eq!(parse_start_time("2024-03-07T21:05:09"), Some(at(21, 5, 9)));
        assert_eq!(parse_start_time(" 2024-03-07 21:05 "), Some(at(21, 5, 0)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_start_time(""), None);
        assert_eq!(parse_start_time("next tuesday"), None);
        assert_eq!(parse_start_time("2024-13-40 10:00:00"), None);
    }

    #[test]
    fn test_classify_uses_strict_inequality() {
        let now = at(12, 0, 0);
        assert_eq!(classify(&(now + Duration::seconds(1)), &now), ShowTiming::Upcoming);
        assert_eq!(classify(&(now - Duration::seconds(1)), &now), ShowTiming::Past);
        assert_eq!(classify(&now, &now), ShowTiming::Now);
    }

    #[test]
    fn test_split_drops_shows_exactly_at_now() {
        let now = at(12, 0, 0);
        let entries = vec![
            (now - Duration::days(1), "yesterday"),
            (now, "right now"),
            (now + Duration::days(1), "tomorrow"),
            (now + Duration::hours(2), "later today"),
        ];

        let (upcoming, past) = split_upcoming_past(entries, &now);

        assert_eq!(upcoming, vec!["tomorrow", "later today"]);
        assert_eq!(past, vec!["yesterday"]);
    }

    #[test]
    fn test_now_is_recent() {
        // After 2000-01-01
        assert!(now().and_utc().timestamp() > 946_684_800);
    }
}
