//! Common error types for Fyyur

use thiserror::Error;

use crate::validation::ValidationErrors;

/// Common result type for Fyyur operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the booking directory
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

    /// Requested record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Submitted fields failed validation; nothing was written
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Error::Validation(errors)
    }
}
