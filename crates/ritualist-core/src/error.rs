//! Core error types for ritualist-core.
//!
//! Evaluation itself is total: schedule checks, completion and streaks never
//! fail. Errors only arise at the edges, when a habit is checked against its
//! configuration invariants, when settings are loaded, or when a log source
//! cannot deliver a snapshot.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for ritualist-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Habit configuration invariant violations
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A timezone identifier that is not in the IANA database
    #[error("Unknown timezone identifier: {0}")]
    UnknownTimezone(String),

    /// Log retrieval failed in an upstream source
    #[error("Log source '{source_name}' failed: {message}")]
    LogSource {
        source_name: String,
        message: String,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
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

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Could not determine where configuration lives
    #[error("Configuration directory unavailable: {0}")]
    DirectoryUnavailable(String),
}

/// Habit configuration invariant violations.
///
/// These are meant to be raised when a habit is created or edited. The
/// evaluation functions never raise them; they clamp instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Numeric habit without a usable daily target
    #[error("Numeric habit requires a positive daily target, got {0:?}")]
    MissingDailyTarget(Option<f64>),

    /// Days-of-week schedule with no days selected
    #[error("Days-of-week schedule must name at least one weekday")]
    EmptyWeekdaySet,

    /// Weekday number outside Monday=1..Sunday=7
    #[error("Weekday number {0} is out of range (expected 1..=7)")]
    WeekdayOutOfRange(u8),

    /// Times-per-week target outside 1..=7
    #[error("Times-per-week target {0} is out of range (expected 1..=7)")]
    WeeklyTargetOutOfRange(u8),

    /// End date precedes start date
    #[error("Invalid date range: end_date ({end}) must not precede start_date ({start})")]
    InvalidDateRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
