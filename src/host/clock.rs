// src/host/clock.rs

//! Current date/time formatting.

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, TimeZone};

use crate::errors::HostError;

/// The two fixed formats callers ask for most.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeDate {
    /// `HH:MM:SS`
    Time,
    /// `YYYY/MM/DD`
    Date,
}

impl TimeDate {
    pub fn pattern(self) -> &'static str {
        match self {
            TimeDate::Time => "%H:%M:%S",
            TimeDate::Date => "%Y/%m/%d",
        }
    }
}

/// Formats the local wall clock with strftime-style patterns.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn format_now(&self, pattern: &str) -> Result<String, HostError> {
        format_at(&Local::now(), pattern)
    }

    pub fn now(&self, which: TimeDate) -> String {
        // Fixed patterns are always valid.
        Local::now().format(which.pattern()).to_string()
    }
}

/// Format `at` with `pattern`, rejecting unrecognised specifiers.
pub fn format_at<Tz>(at: &DateTime<Tz>, pattern: &str) -> Result<String, HostError>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(HostError::InvalidFormat(pattern.to_string()));
    }

    let mut out = String::new();
    write!(out, "{}", at.format_with_items(StrftimeItems::new(pattern)))
        .map_err(|_| HostError::InvalidFormat(pattern.to_string()))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn fixed() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap()
    }

    #[test]
    fn presets_match_expected_shape() {
        assert_eq!(format_at(&fixed(), TimeDate::Time.pattern()).unwrap(), "07:05:01");
        assert_eq!(format_at(&fixed(), TimeDate::Date.pattern()).unwrap(), "2024/03/09");
    }

    #[test]
    fn unknown_specifier_is_invalid_format() {
        match format_at(&fixed(), "%Y-%Q") {
            Err(HostError::InvalidFormat(p)) => assert_eq!(p, "%Y-%Q"),
            other => panic!("expected InvalidFormat, got {other:?}"),
        }
    }

    #[test]
    fn literal_text_passes_through() {
        assert_eq!(format_at(&fixed(), "year %Y").unwrap(), "year 2024");
    }

    #[test]
    fn system_clock_formats_now() {
        let s = SystemClock.format_now("%Y").unwrap();
        assert_eq!(s.len(), 4);
        assert!(SystemClock.format_now("%").is_err());
    }
}
