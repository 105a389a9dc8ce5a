//! Core error types for the Finboard dashboard.
//!
//! Storage backends convert their own failures into [`StorageError`] so the
//! rest of the crate stays backend-agnostic.

use thiserror::Error;

use finboard_market_data::MarketDataError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the dashboard core.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid config file: {0}")]
    MalformedImport(String),

    #[error("Storage operation failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Widget not found: {0}")]
    WidgetNotFound(String),
}

/// Validation errors for user input.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Refresh interval must be at least 1 second")]
    InvalidRefreshInterval,

    #[error("Duplicate widget id: {0}")]
    DuplicateId(String),

    #[error("Index {index} is out of range for {len} widgets")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Backend-agnostic error type for durable key-value storage.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to read storage: {0}")]
    ReadFailed(String),

    #[error("Failed to write storage: {0}")]
    WriteFailed(String),

    #[error("Stored record '{key}' is corrupt: {message}")]
    Corrupt { key: String, message: String },

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
