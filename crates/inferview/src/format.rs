//! Per-cell display formatting driven by the column's semantic category.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::types::{SemanticCategory, classify};

/// Shown for null or missing cells.
pub const PLACEHOLDER: &str = "-";

/// Output format for parsed dates (fixed, locale independent).
const DATE_DISPLAY_FORMAT: &str = "%m/%d/%Y";

/// Timestamp layouts accepted besides RFC 3339.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Format a raw cell value for display, given its column's raw dtype tag.
///
/// Never fails: anything that cannot be interpreted according to the
/// column category falls back to its plain string form.
pub fn format_value(value: Option<&Value>, raw_tag: &str) -> String {
    let value = match value {
        None | Some(Value::Null) => return PLACEHOLDER.to_string(),
        Some(v) => v,
    };

    match classify(raw_tag).category {
        SemanticCategory::DateTime => match parse_calendar_date(value)
            .filter(|date| (0..=9999).contains(&date.year()))
        {
            Some(date) => date.format(DATE_DISPLAY_FORMAT).to_string(),
            None => plain_string(value),
        },
        SemanticCategory::Boolean => {
            if is_truthy(value) {
                "Yes".to_string()
            } else {
                "No".to_string()
            }
        }
        SemanticCategory::Decimal => match value.as_f64() {
            Some(n) => format_decimal(n),
            None => plain_string(value),
        },
        _ => plain_string(value),
    }
}

/// String form of a value: strings verbatim, everything else as JSON text.
///
/// Whole-valued floats drop the fraction (`30.0` shows as `30`).
pub fn plain_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) if f == 0.0 => "0".to_string(),
            Some(f) if f.fract() == 0.0 && f.abs() < 1e21 => format!("{:.0}", f),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

/// Two fraction digits, exact halves rounded away from zero.
///
/// `{:.2}` already rounds the exact binary value correctly; it only differs
/// on exact ties, which are the odd multiples of 1/8.
fn format_decimal(n: f64) -> String {
    let eighths = n * 8.0;
    if eighths.fract() == 0.0 && eighths % 2.0 != 0.0 {
        format!("{:.2}", (n * 100.0).round() / 100.0)
    } else {
        format!("{:.2}", n)
    }
}

/// Loose truthiness: `false`, zero and the empty string are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// The calendar date a value denotes, if it is a valid date/time.
///
/// Integers are read as epoch milliseconds (UTC). Timestamps with an offset
/// keep the date as written in that offset.
fn parse_calendar_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => parse_date_str(s.trim()),
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| dt.date_naive()),
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}
