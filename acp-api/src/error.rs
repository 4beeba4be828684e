//! Error types for the ACP API

use thiserror::Error;

/// Result type alias using ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

/// API-level errors
///
/// These signal caller bugs, not runtime conditions: indeterminate
/// snapshots and failed preconditions surface as `None` from the engine
/// and are passed through unchanged, and fetch failures land in a
/// snapshot's `inaccessible_urls` rather than here.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A sentinel class IRI was passed where an individual actor is required
    #[error("Invalid actor: {message}")]
    InvalidActor { message: String },
}

impl ApiError {
    /// Create an invalid actor error
    pub fn invalid_actor(message: impl Into<String>) -> Self {
        Self::InvalidActor {
            message: message.into(),
        }
    }
}
