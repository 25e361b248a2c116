//! Common error types for the album catalog

use thiserror::Error;

/// Common result type for catalog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the catalog crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Write would break catalog invariants (e.g. duplicate id)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Transport failure talking to the catalog API
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Catalog API answered with a non-success status
    #[error("Server returned {status}: {message}")]
    Remote { status: u16, message: String },

    /// Mutation attempted against the read-only production snapshot
    #[error("Catalog is read-only in production mode")]
    ReadOnly,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
