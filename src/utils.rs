//! Utility functions for date handling and log formatting.
//!
//! This module provides helper functions used throughout the application:
//! - Local-calendar `YYYY-MM-DD` formatting and parsing for the date range
//! - The default "last seven days" range
//! - String truncation for logging response bodies

use chrono::{Datelike, Duration, NaiveDate};

/// Number of days the default search window reaches back from today.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 7;

/// Format a date as `YYYY-MM-DD` using its own calendar components.
///
/// For a `DateTime<Local>` this is the local year/month/day, not UTC. Month
/// and day are zero-padded to two digits; the year is written as-is.
///
/// # Examples
///
/// ```ignore
/// let d = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
/// assert_eq!(format_date(&d), "2024-03-05");
/// ```
pub fn format_date<D: Datelike>(date: &D) -> String {
    format!("{}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Parse a `YYYY-MM-DD` string typed by the user.
///
/// Returns `None` for anything that is not a real calendar date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// The default `[today - 7 days, today]` range.
pub fn default_date_range(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    lookback_range(today, DEFAULT_LOOKBACK_DAYS)
}

/// A `[today - days, today]` range. Saturates at the earliest representable date.
pub fn lookback_range(today: NaiveDate, days: i64) -> (NaiveDate, NaiveDate) {
    let start = Duration::try_days(days)
        .and_then(|d| today.checked_sub_signed(d))
        .unwrap_or(NaiveDate::MIN);
    (start, today)
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (backing off to a char
/// boundary) with an ellipsis and byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}
