//! UseCase error types.

use thiserror::Error;

use crate::domain::{EnvelopeError, TransportError};

#[derive(Debug, Error)]
pub enum ConnectError {
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    #[error("failed to send greeting: {0}")]
    GreetingFailed(#[source] TransportError),
}

#[derive(Debug, Error)]
pub enum SendMessageError {
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),
}

#[derive(Debug, Error)]
pub enum DisconnectError {
    #[error("failed to close connection: {0}")]
    CloseFailed(#[source] TransportError),
}
