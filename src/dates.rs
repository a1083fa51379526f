//! Date normalization for sort keys.
//!
//! Articles carry dates in whatever shape their authors wrote them. Everything
//! is reduced to a `YYYY-MM-DD` string so hub listings can sort
//! lexicographically. Text that doesn't parse is kept (trimmed) rather than
//! failing the build; it just won't sort meaningfully.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde_yaml_ng::Value;

const CANONICAL: &str = "%Y-%m-%d";

/// A date before normalization.
///
/// YAML front-matter has no timestamp type, so [`DateValue::from_yaml`] only
/// ever yields `Text`. The `Date`, `DateTime` and `Zoned` variants are for
/// library callers that already hold a parsed chrono value and want the same
/// sort key the scanner would produce for its text form.
#[derive(Debug, Clone, PartialEq)]
pub enum DateValue {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Zoned(DateTime<FixedOffset>),
    Text(String),
}

impl DateValue {
    /// Map a YAML scalar to a date value. `null` and containers are treated as absent.
    pub fn from_yaml(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Number(n) => Some(Self::Text(n.to_string())),
            Value::Bool(b) => Some(Self::Text(b.to_string())),
            Value::Tagged(tagged) => Self::from_yaml(&tagged.value),
            Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
        }
    }
}

/// Reduce a date to its canonical `YYYY-MM-DD` form.
///
/// - structured values render directly
/// - text is tried against the ISO-8601 shapes in [`parse_iso`]; unparseable
///   text comes back trimmed but otherwise verbatim
/// - absence yields `""`, which sorts after every real date in descending order
pub fn normalize_date(value: Option<&DateValue>) -> String {
    match value {
        None => String::new(),
        Some(DateValue::Date(d)) => d.format(CANONICAL).to_string(),
        Some(DateValue::DateTime(dt)) => dt.date().format(CANONICAL).to_string(),
        Some(DateValue::Zoned(dt)) => dt.date_naive().format(CANONICAL).to_string(),
        Some(DateValue::Text(text)) => {
            let trimmed = text.trim();
            match parse_iso(trimmed) {
                Some(date) => date.format(CANONICAL).to_string(),
                None => trimmed.to_string(),
            }
        }
    }
}

/// Parse the ISO-8601 shapes authors actually write.
///
/// Accepted: `2024-03-05`, `2024-03-05T10:00:00Z` (RFC 3339 with any offset),
/// `2024-03-05T10:00:00`, `2024-03-05 10:00:00` (optionally with fractional
/// seconds). The zoned form keeps its local calendar date.
pub fn parse_iso(text: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(text, CANONICAL) {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|dt| dt.date())
}
