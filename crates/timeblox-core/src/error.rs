//! Core error types for timeblox-core.
//!
//! This module defines the error hierarchy using thiserror. Planner actions
//! propagate these with `?`; the CLI prints them and exits non-zero.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for timeblox-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors (bad indices, malformed clock text, bad date keys)
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The external schedule generator failed
    #[error(transparent)]
    Generation(#[from] GenerationError),

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

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Home or data directory could not be resolved/created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Out of bounds
    #[error("Index {index} out of bounds for {collection} (length: {len})")]
    OutOfBounds {
        collection: String,
        index: usize,
        len: usize,
    },

    /// Clock text that does not match `H:MM AM|PM`
    #[error("Malformed clock time '{0}': expected H:MM AM or H:MM PM")]
    MalformedClock(String),

    /// Date or month key that does not parse
    #[error("Malformed {kind} key '{value}'")]
    MalformedKey { kind: &'static str, value: String },

    /// Unknown master template slot
    #[error("No master template slot with id {0}")]
    UnknownMaster(u8),

    /// Unknown activity category
    #[error("No activity category with id '{0}'")]
    UnknownCategory(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ValidationError {
    pub(crate) fn out_of_bounds(collection: &str, index: usize, len: usize) -> Self {
        Self::OutOfBounds {
            collection: collection.to_string(),
            index,
            len,
        }
    }
}

/// Failure of the external text-to-schedule generator.
///
/// Every failure collapses to one user-facing category; `detail` keeps the
/// underlying reason for logs.
#[derive(Error, Debug)]
#[error("Failed to generate schedule. The generator might be temporarily unavailable or the input could not be processed.")]
pub struct GenerationError {
    pub detail: String,
}

impl GenerationError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_error_has_single_user_facing_message() {
        let a = CoreError::from(GenerationError::new("timeout"));
        let b = CoreError::from(GenerationError::new("bad json"));
        assert_eq!(a.to_string(), b.to_string());
        assert!(a.to_string().starts_with("Failed to generate schedule"));
    }

    #[test]
    fn out_of_bounds_message_names_collection() {
        let err = ValidationError::out_of_bounds("schedule 2024-05-01", 7, 3);
        assert_eq!(
            err.to_string(),
            "Index 7 out of bounds for schedule 2024-05-01 (length: 3)"
        );
    }
}
