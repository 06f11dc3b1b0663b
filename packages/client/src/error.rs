//! Error types for the terminal client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Could not open the WebSocket
    #[error("Connection error: {0}")]
    Connection(String),

    /// An established connection dropped
    #[error("Connection lost")]
    ConnectionLost,

    /// Gave up after repeated connection failures
    #[error("Failed to reconnect after {0} attempts")]
    ReconnectFailed(u32),
}
