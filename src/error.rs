//! Error types surfaced by store operations.

use std::io;
use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or missing input, e.g. a short username or a bad
    /// collection name.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No credential was presented at all.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// A credential was presented but resolves to no identity.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Uniqueness violation.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Referenced user, project or document does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write-path I/O failure. Read-path failures never reach the caller;
    /// they degrade to the read fallback instead.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Write-path serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
