//! Error types for the student bulk-post client.
//!
//! # Design
//! Only caller mistakes and local failures are errors. A non-200 answer from
//! the student endpoint is not an error here: it comes back as
//! [`BulkOutcome::Failed`](crate::BulkOutcome::Failed) so the caller can
//! inspect the raw body.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned by the payload builder and `StudentClient`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request, a student record, or an action tag has the wrong shape.
    /// Raised before anything is sent; the whole batch is rejected.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The injected transport could not complete the round-trip.
    #[error("transport failed: {0}")]
    Transport(String),

    /// A 200 response body could not be deserialized.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

impl ApiError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        ApiError::InvalidArgument(msg.into())
    }
}
