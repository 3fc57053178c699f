//! Configuration errors.

use super::error_code::{self, ErrorCode};

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config parse error in {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Config validation failed for {field}: {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Capacity for {field} is {value}, below the minimum viable {minimum}")]
    CapacityExceeded {
        field: String,
        value: usize,
        minimum: usize,
    },
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::CapacityExceeded { .. } => error_code::CAPACITY_EXCEEDED,
            _ => error_code::CONFIG_ERROR,
        }
    }
}
