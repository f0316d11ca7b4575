use chrono::{DateTime, Local, TimeZone};
use core::fmt::Display;

const LOG_TARGET: &str = "      time";

/// The time format understood by the graphing backend's `from`/`until` parameters
pub const TIME_FORMAT: &str = "%H:%M_%Y%m%d";

/// A start or end time as supplied by a caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeInput {
    /// Seconds since the Unix epoch
    Unix(i64),

    /// Either the decimal text of a Unix timestamp or a value already in backend format
    Text(String),
}

impl From<i64> for TimeInput {
    fn from(value: i64) -> Self {
        Self::Unix(value)
    }
}

impl From<i32> for TimeInput {
    fn from(value: i32) -> Self {
        Self::Unix(value.into())
    }
}

impl From<&str> for TimeInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for TimeInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Format a time for the backend using the local timezone
///
/// Integer input (or text that parses as one) is a Unix timestamp and is rendered as
/// `HH:MM_YYYYMMDD`; zero is a regular timestamp. Any other text is returned unchanged.
#[must_use]
pub fn format_time(value: impl Into<TimeInput>) -> String {
    format_time_in(value, &Local)
}

/// Like [`format_time`], in an explicit timezone
#[must_use]
pub fn format_time_in<Tz>(value: impl Into<TimeInput>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match value.into() {
        TimeInput::Unix(timestamp) => format_timestamp(timestamp, tz),
        TimeInput::Text(text) => match text.trim().parse::<i64>() {
            Ok(timestamp) => format_timestamp(timestamp, tz),
            Err(_) => text,
        },
    }
}

fn format_timestamp<Tz>(timestamp: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    DateTime::from_timestamp(timestamp, 0).map_or_else(
        || {
            log::warn!(target: LOG_TARGET, "Timestamp {timestamp} is out of range, passing it through unchanged");
            timestamp.to_string()
        },
        |utc| utc.with_timezone(tz).format(TIME_FORMAT).to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_unix_zero_in_utc() {
        assert_eq!(format_time_in(0, &Utc), "00:00_19700101");
    }

    #[test]
    fn test_unix_zero_in_fixed_offset() {
        let mountain = FixedOffset::west_opt(7 * 3600).unwrap();
        assert_eq!(format_time_in(0, &mountain), "17:00_19691231");
    }

    #[test]
    fn test_numeric_text_is_a_timestamp() {
        assert_eq!(format_time_in("0", &Utc), "00:00_19700101");
        assert_eq!(format_time_in(" 1700000000 ", &Utc), "22:13_20231114");
    }

    #[test]
    fn test_now_matches_local_clock() {
        let now = Local::now();
        let expected = now.format(TIME_FORMAT).to_string();
        assert_eq!(format_time(now.timestamp()), expected);
    }

    #[test]
    fn test_text_passes_through() {
        assert_eq!(format_time("not-a-number"), "not-a-number");
        assert_eq!(format_time("-1d"), "-1d");
        assert_eq!(format_time("12:30_20240101"), "12:30_20240101");
        assert_eq!(format_time(String::from("1.5")), "1.5");
    }

    #[test]
    fn test_out_of_range_timestamp_passes_through() {
        assert_eq!(format_time_in(i64::MAX, &Utc), i64::MAX.to_string());
    }
}
