//! Core data models for outlay-cli
//!
//! This module contains the record types persisted to the data files:
//! purchase items and money entries. Each record type knows its own flat-row
//! representation (column headers, strict parsing, formatting), which the
//! storage layer is generic over.

pub mod item;
pub mod money_entry;

pub use item::ItemRecord;
pub use money_entry::{MoneyRecord, MoneySummary};

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDateTime;

/// Timestamp format used in persisted rows
pub const DATE_FMT: &str = "%Y-%m-%d %H:%M";

/// A record type that can be persisted as one flat row
///
/// `from_row` is the strict constructor: a value that is present but
/// malformed (bad date, non-numeric amount, out-of-range rating) is an error.
/// Missing optional columns fall back to documented defaults so that files
/// written by older schema versions keep loading.
pub trait RowRecord: Sized {
    /// Human-readable name used in messages ("item", "money entry")
    const KIND: &'static str;

    /// Column names in write order
    fn headers() -> &'static [&'static str];

    /// Columns that must be present in a file's header row
    fn required_columns() -> &'static [&'static str];

    /// Parse a record from a column-name -> value map
    fn from_row(row: &HashMap<String, String>) -> Result<Self, RowError>;

    /// Serialize to (column, value) pairs in header order
    fn to_row(&self) -> Vec<(&'static str, String)>;
}

/// A field-level parse failure inside one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub field: &'static str,
    pub reason: String,
}

impl RowError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

impl std::error::Error for RowError {}

/// Format a decimal the way rows store it (2-decimal fixed)
pub(crate) fn fmt_decimal(value: f64) -> String {
    format!("{:.2}", value)
}

pub(crate) fn row_value<'a>(row: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    row.get(key).map(|s| s.as_str())
}

pub(crate) fn parse_row_date(raw: Option<&str>) -> Result<NaiveDateTime, RowError> {
    let raw = raw.unwrap_or("");
    NaiveDateTime::parse_from_str(raw, DATE_FMT)
        .map_err(|_| RowError::new("date", format!("invalid date '{}'", raw)))
}

/// Parse a non-negative decimal; empty or missing means 0.00
pub(crate) fn parse_row_decimal(field: &'static str, raw: Option<&str>) -> Result<f64, RowError> {
    let raw = raw.unwrap_or("").trim();
    if raw.is_empty() {
        return Ok(0.0);
    }
    let value: f64 = raw
        .parse()
        .map_err(|_| RowError::new(field, format!("invalid decimal '{}'", raw)))?;
    if value < 0.0 {
        return Err(RowError::new(field, format!("must not be negative, got {}", raw)));
    }
    Ok(value)
}

/// Parse a 1-5 rating; empty or missing falls back to `default`
pub(crate) fn parse_row_rating(
    field: &'static str,
    raw: Option<&str>,
    default: i32,
) -> Result<i32, RowError> {
    let raw = match raw {
        Some(s) if !s.trim().is_empty() => s.trim(),
        _ => return Ok(default),
    };
    let value: i32 = raw
        .parse()
        .map_err(|_| RowError::new(field, format!("invalid rating '{}'", raw)))?;
    if !(1..=5).contains(&value) {
        return Err(RowError::new(
            field,
            format!("rating must be between 1 and 5, got {}", value),
        ));
    }
    Ok(value)
}

/// Parse an optional derived score; empty or missing means unscored
pub(crate) fn parse_row_score(raw: Option<&str>) -> Result<Option<f64>, RowError> {
    let raw = raw.unwrap_or("").trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse()
        .map(Some)
        .map_err(|_| RowError::new("overall_score", format!("invalid decimal '{}'", raw)))
}
