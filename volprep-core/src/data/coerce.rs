//! Lenient type coercion: anything that does not parse becomes the missing marker.
//!
//! Nothing here returns an error. Rows with missing required fields are
//! dropped later by the canonicalizer, so a bad cell costs one row, never the run.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Date-only formats tried in order after ISO parsing fails.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d-%b-%y",
    "%d-%b-%Y",
    "%m/%d/%Y",
    "%b %d, %Y",
    "%Y/%m/%d",
];

/// Date-time formats without offset; the time part is discarded.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse a numeric cell. Empty, `NA`, text and non-finite values are missing.
pub fn coerce_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a date cell in any of the accepted layouts.
pub fn coerce_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc().date());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(date);
        }
    }
    None
}

/// Coerce a JSON cell to a number. Numbers pass through, strings are parsed.
pub fn coerce_json_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => coerce_number(s),
        _ => None,
    }
}

/// Coerce a JSON cell to a date. Strings are parsed, integers are epoch seconds.
pub fn coerce_json_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => coerce_date(s),
        Value::Number(n) => n
            .as_i64()
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .map(|dt| dt.naive_utc().date()),
        _ => None,
    }
}
