//! Error types and handling for tooltrace core
//!
//! Business errors raised by traced handlers are never wrapped in these
//! types; they flow back to the caller exactly as the handler produced them.

use thiserror::Error;

/// Result type alias for tooltrace operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for tooltrace core
#[derive(Error, Debug)]
pub enum Error {
    /// Trace delivery errors
    #[error("Trace error: {0}")]
    Trace(#[from] TraceError),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for field '{field}': {value}")]
    InvalidValue { field: String, value: String },
}

/// Errors raised while delivering a finished trace
#[derive(Error, Debug, PartialEq)]
pub enum TraceError {
    #[error("Reserved key '{key}' is already present in response data")]
    ReservedKey { key: String },

    #[error("Invalid trace report: {message}")]
    InvalidReport { message: String },
}
