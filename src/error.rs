//! Custom error types for outlay-cli
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for outlay-cli operations
#[derive(Error, Debug)]
pub enum OutlayError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// CSV reading/writing errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Backup source file does not exist
    #[error("Cannot back up missing file: {}", .path.display())]
    SourceMissing { path: PathBuf },

    /// A data file is missing required columns
    #[error("{}: missing required columns: {columns}", .path.display())]
    Schema { path: PathBuf, columns: String },

    /// A persisted row could not be parsed into a record
    #[error("Failed to parse record in {} (row {row}): {reason}", .path.display())]
    RecordParse {
        path: PathBuf,
        row: u64,
        reason: String,
    },

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },
}

impl OutlayError {
    /// Create a schema error from the list of missing column names
    pub fn missing_columns(path: impl Into<PathBuf>, missing: &[&str]) -> Self {
        Self::Schema {
            path: path.into(),
            columns: missing.join(", "),
        }
    }

    /// Check if this error means persisted data could not be read
    ///
    /// The presentation layer treats these as fatal ("your data could not be
    /// read"), as opposed to informational conditions like config warnings.
    pub fn is_data_error(&self) -> bool {
        matches!(self, Self::Schema { .. } | Self::RecordParse { .. })
    }

    /// Check if this is a missing backup source error
    pub fn is_source_missing(&self) -> bool {
        matches!(self, Self::SourceMissing { .. })
    }

    /// Create a "not found" error for items
    pub fn item_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Item",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for money entries
    pub fn entry_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Money entry",
            identifier: identifier.into(),
        }
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for OutlayError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for OutlayError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for OutlayError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

/// Result type alias for outlay-cli operations
pub type OutlayResult<T> = Result<T, OutlayError>;
