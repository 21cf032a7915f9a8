//! Error types for sheetnest.

use thiserror::Error;

/// Result type alias for sheetnest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during nesting operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid geometry provided.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Invalid sheet/boundary provided.
    #[error("Invalid boundary: {0}")]
    InvalidBoundary(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// NFP computation failed.
    #[error("NFP computation failed: {0}")]
    NfpError(String),

    /// The boolean/offset kernel is not initialised.
    #[error("Clipping kernel unavailable")]
    KernelUnavailable,

    /// No valid placement found.
    #[error("No valid placement found for design: {0}")]
    NoPlacement(String),

    /// Computation cancelled.
    #[error("Computation cancelled")]
    Cancelled,

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Returns true if this is the cancellation sentinel.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}
