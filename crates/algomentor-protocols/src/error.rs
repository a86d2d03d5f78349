//! Error taxonomy for the helper runtime.

use thiserror::Error;

/// Durable key-value store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Remote completion errors.
///
/// A single attempt per request; every failure propagates to the session
/// controller, which renders it without persisting anything.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Network-level failure reaching the provider.
    #[error("Network error: {0}")]
    Network(String),

    /// Explicit error payload reported by the provider.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Success status but the expected text path was absent from the body.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}
