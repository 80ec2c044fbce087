//! Common error types for the lead qualifier

use thiserror::Error;

/// Common result type for lead qualifier operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the lead qualifier crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Seed file could not be imported. `line` is the 1-based file line
    /// (the header is line 1), or 0 when no position is known.
    #[error("Seed import failed at line {line}: {message}")]
    Seed { line: u64, message: String },

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// JSON (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// True when the error originates from the store itself
    pub fn is_storage(&self) -> bool {
        matches!(self, Error::Database(_))
    }
}
