//! Parsing and display of article publication dates.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Renders as e.g. `Jan 5, 2025`.
const DISPLAY_FORMAT: &str = "%b %-d, %Y";

const NAIVE_DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

const NAIVE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a feed `pubDate` into a calendar date. Timestamps with an offset
/// keep the date as written in that offset; they are not shifted to local
/// time.
pub fn parse_pub_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.naive_local().date());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.naive_local().date());
    }
    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(input, NAIVE_DATE_FORMAT).ok()
}

/// Formats a `pubDate` for display. Returns `None` when the date is absent
/// or can't be parsed; callers render that as a blank date.
pub fn format_pub_date(input: Option<&str>) -> Option<String> {
    input
        .and_then(parse_pub_date)
        .map(|date| date.format(DISPLAY_FORMAT).to_string())
}
