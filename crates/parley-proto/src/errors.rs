//! Protocol error types.

use thiserror::Error;

/// Errors produced while encoding or decoding socket events.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Event could not be serialized.
    #[error("failed to encode event: {0}")]
    Encode(#[source] serde_json::Error),

    /// Frame text is not a known event or has a malformed payload.
    #[error("failed to decode event: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;
