//! Error types for acp-core

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// A backing resource could not be fetched
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Subject not found in a dataset or fetched resource
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed IRI or value
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a fetch error
    pub fn fetch(msg: impl Into<String>) -> Self {
        Error::Fetch(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    /// Create an invalid value error
    pub fn invalid_value(msg: impl Into<String>) -> Self {
        Error::InvalidValue(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }
}
