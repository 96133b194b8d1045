//! Error types for eob-extract

use std::io;
use thiserror::Error;

/// Result type for eob-extract operations
pub type Result<T> = std::result::Result<T, EobError>;

/// Errors that can occur while extracting records
#[derive(Debug, Error)]
pub enum EobError {
    /// I/O error (open, seek, read, write, or a truncated record)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Record framing is not usable, e.g. a length field out of bounds
    #[error("Invalid record format: {0}")]
    InvalidFormat(String),

    /// Opening the input did not complete before the deadline
    #[error("Timed out after {millis} ms opening input")]
    Timeout {
        /// Deadline that was exceeded
        millis: u64,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}
