//! Value parsing helpers used by checks
//!
//! Everything here is a pure function of a raw JSON value: stringification,
//! integer coercion, boolean normalization, and format matching.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Email shape: local part, `@`, dotted domain with an alphabetic TLD
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9-]+(\.[a-zA-Z0-9-]+)*\.[a-zA-Z]{2,}$").unwrap()
});

static DATETIME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}$").unwrap());

static DATE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

static TIME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{2}:\d{2}$").unwrap());

/// Text form of a value: strings verbatim, anything else as compact JSON
pub fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Whether a value counts as absent for the required check
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Coerce a value to an integer.
///
/// Integral numbers pass through, floats truncate toward zero, strings are
/// parsed after trimming whitespace, booleans map to 1 and 0.
pub fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

/// Map an accepted boolean literal to its boolean value
pub fn normalize_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        Value::Number(n) => match n.as_f64() {
            Some(f) if f == 1.0 => Some(true),
            Some(f) if f == 0.0 => Some(false),
            _ => None,
        },
        _ => None,
    }
}

pub fn is_email(text: &str) -> bool {
    EMAIL_REGEX.is_match(text)
}

/// `YYYY-MM-DD HH:MM` naming a real calendar date and clock time
pub fn is_datetime(text: &str) -> bool {
    DATETIME_REGEX.is_match(text) && NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M").is_ok()
}

/// `YYYY-MM-DD` naming a real calendar date
pub fn is_date(text: &str) -> bool {
    DATE_REGEX.is_match(text) && NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
}

/// `HH:MM` naming a real clock time
pub fn is_time(text: &str) -> bool {
    TIME_REGEX.is_match(text) && NaiveTime::parse_from_str(text, "%H:%M").is_ok()
}

/// Decode JSON text
pub fn parse_json(text: &str) -> Option<Value> {
    serde_json::from_str(text).ok()
}
