//! Error handling for StitchKit
//!
//! Provides the error type shared by the workspace:
//! - I/O failures while reading or writing charts and settings
//! - Serialization failures for documents and the clipboard
//! - Chart construction requests that can never succeed
//!
//! Lookup misses (unknown stitch, out of range grid position) are not
//! errors: they resolve to a default or to `None`.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for StitchKit
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization or deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A chart could not be built from the requested parameters
    #[error("Invalid chart: {reason}")]
    InvalidChart {
        /// Why the chart parameters were rejected.
        reason: String,
    },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a message
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create an invalid chart error
    pub fn invalid_chart(reason: impl Into<String>) -> Self {
        Self::InvalidChart {
            reason: reason.into(),
        }
    }
}

/// Result type for StitchKit operations
pub type Result<T> = std::result::Result<T, Error>;
