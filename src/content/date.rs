//! Publication dates
//!
//! Authors write dates for display ("Jan 13 2026"), so the original string is
//! kept verbatim next to the calendar date used for ordering.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};
use std::fmt;

/// Date-only formats, tried in order
const DATE_FORMATS: &[&str] = &[
    "%b %d %Y",
    "%b %d, %Y",
    "%d %b %Y",
    "%B %d %Y",
    "%B %d, %Y",
    "%d %B %Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
];

/// Date-time formats; the time part is discarded
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// A front-matter date: the authored text plus the calendar date it denotes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PubDate {
    raw: String,
    date: NaiveDate,
}

impl PubDate {
    /// Parse an authored date string, returning `None` if no known format matches
    pub fn parse(raw: &str) -> Option<Self> {
        let date = parse_date_string(raw)?;
        Some(Self {
            raw: raw.to_string(),
            date,
        })
    }

    /// The string exactly as written in the front matter
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Format the calendar date with a chrono format string
    pub fn format(&self, fmt: &str) -> String {
        self.date.format(fmt).to_string()
    }

    /// RFC 2822 timestamp at midnight UTC, as used by RSS
    pub fn to_rfc2822(&self) -> String {
        self.date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().to_rfc2822())
            .unwrap_or_default()
    }
}

impl fmt::Display for PubDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for PubDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

/// Parse a date string in various formats
fn parse_date_string(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    // RFC 3339 / ISO 8601 with offset
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    None
}
