//! Error types for the validation client.
//!
//! These never cross [`ValidationClient::validate`](crate::ValidationClient::validate);
//! they are folded into a [`ValidationResult`](crate::ValidationResult) there.

use thiserror::Error;

/// Client-side errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The HTTP session could not be built or a request failed.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// A body could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An `expires_at` value is not an ISO-8601 timestamp.
    #[error("invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp {
        /// The raw value received from the server.
        value: String,
        /// Why parsing failed.
        reason: String,
    },
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
