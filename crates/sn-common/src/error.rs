//! Error types for storage-node stats.
//!
//! This module provides structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Recoverability hints that decide whether a run can continue
//!
//! Line-level problems (malformed lines, unexpected events) are recoverable:
//! the line is skipped and the run goes on. Protocol and I/O errors abort it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for storage-node stats operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Configuration and argument errors.
    Config,
    /// Problems with individual log lines.
    Input,
    /// Defects in the tool's own control flow.
    Internal,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Internal => write!(f, "internal"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for storage-node stats.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("at least 1 day per period, not: {days}")]
    InvalidPeriod { days: i64 },

    // Input errors (20-29)
    #[error("malformed line: {0}")]
    MalformedLine(String),

    #[error("unexpected event '{kind}' from module '{module}'")]
    UnexpectedEvent { module: String, kind: String },

    // Internal errors (30-39)
    #[error("protocol error: {0}")]
    Protocol(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: Input errors
    /// - 30-39: Internal errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidPeriod { .. } => 11,
            Error::MalformedLine(_) => 20,
            Error::UnexpectedEvent { .. } => 21,
            Error::Protocol(_) => 30,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::InvalidPeriod { .. } => ErrorCategory::Config,
            Error::MalformedLine(_) | Error::UnexpectedEvent { .. } => ErrorCategory::Input,
            Error::Protocol(_) => ErrorCategory::Internal,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether processing can continue after this error.
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Skip the line, keep the period going
            Error::MalformedLine(_) => true,
            Error::UnexpectedEvent { .. } => true,

            // Must be fixed by the operator before a run starts
            Error::Config(_) => false,
            Error::InvalidPeriod { .. } => false,

            // A bug in the aggregator
            Error::Protocol(_) => false,

            Error::Io(_) => false,
            Error::Json(_) => false,
        }
    }
}
