//! Domain error types.

use thiserror::Error;

/// Errors raised by a connection's transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The stream is already closed
    #[error("connection closed")]
    Closed,

    /// Sending a message failed
    #[error("send failed: {0}")]
    Send(String),

    /// Receiving a message failed without ending the stream
    #[error("receive failed: {0}")]
    Receive(String),

    /// Closing the stream failed
    #[error("close failed: {0}")]
    Close(String),
}

/// Errors raised while encoding or decoding an envelope.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("failed to encode envelope: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode envelope: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Validation errors for value objects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("connection id must not be empty")]
    EmptyConnectionId,
}
