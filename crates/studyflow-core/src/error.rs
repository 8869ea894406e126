//! Core error types for studyflow-core.
//!
//! This module defines the error hierarchy using thiserror. Failures that
//! belong to a single assignment are reported as strings inside the batch
//! report rather than as `Err` returns; the types here cover everything
//! with a caller that can act on it.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for studyflow-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Calendar collaborator errors
    #[error("Calendar error: {0}")]
    Calendar(#[from] CalendarError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Missing required configuration key
    #[error("Missing required configuration key: {0}")]
    MissingKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Errors from calendar collaborators (read or write side).
#[derive(Error, Debug)]
pub enum CalendarError {
    /// Transport-level failure
    #[error("Calendar request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The calendar API returned an error payload
    #[error("Calendar API error: {message}")]
    Api { message: String },

    /// The response did not have the expected shape
    #[error("Malformed calendar response: {0}")]
    MalformedResponse(String),

    /// A local calendar store lock was poisoned
    #[error("Calendar store poisoned")]
    StorePoisoned,
}

/// Validation errors for intervals and assignment requests.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid time range
    #[error("Invalid time range: end ({end}) must be greater than start ({start})")]
    InvalidTimeRange {
        start: chrono::DateTime<chrono::FixedOffset>,
        end: chrono::DateTime<chrono::FixedOffset>,
    },

    /// Unparseable due date. The display text is the exact message recorded
    /// in placement results for this failure.
    #[error("Invalid due_date format; expected ISO datetime string.")]
    InvalidDueDate { value: String },

    /// Assignment without a usable title
    #[error("Assignment title must not be empty.")]
    MissingTitle,

    /// Estimated duration that cannot produce a slot
    #[error("Invalid estimated duration ({hours} hours); expected a schedulable number of hours.")]
    InvalidDuration { hours: f64 },

    /// Prep span that cannot be projected back from the due date
    #[error("Invalid prep_span_days ({days}); expected a schedulable number of days.")]
    InvalidPrepSpan { days: i64 },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
