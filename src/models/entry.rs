use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};

/// Calendar month derived from a row's timestamp (`YYYY-MM`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(timestamp: &NaiveDateTime) -> Self {
        Self {
            year: timestamp.year(),
            month: timestamp.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A persisted row after type coercion. Anything that failed to parse is
/// `None`; nothing here is ever an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entry {
    pub timestamp: Option<NaiveDateTime>,
    pub month: Option<YearMonth>,
    pub weight: Option<f64>,
    pub sleep_hours: Option<f64>,
    pub mood: Option<f64>,
    pub spend: Option<f64>,
    pub spend_category: Option<String>,
    pub lunch_menu: Option<String>,
}

/// Numeric coercion: blank, unparseable and non-finite values become `None`.
pub fn coerce_number(raw: Option<&str>) -> Option<f64> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Accepts `YYYY-MM-DD HH:MM`, `YYYY-MM-DD HH:MM:SS`, RFC 3339 and a bare date.
pub fn parse_timestamp(raw: Option<&str>) -> Option<NaiveDateTime> {
    let s = raw.map(str::trim).filter(|s| !s.is_empty())?;

    for format in ["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, format) {
            return Some(ts);
        }
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.naive_local());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

pub fn coerce_text(raw: Option<&str>) -> Option<String> {
    raw.filter(|s| !s.trim().is_empty()).map(str::to_owned)
}
