//! Transport abstractions for one duplex message stream.
//!
//! A stream is split into an outbound [`MessageSink`], shared by everyone who
//! may write to the client (its own greeting, other connections' broadcasts,
//! the final close), and an inbound [`MessageSource`], owned by the
//! connection's receive loop.

use async_trait::async_trait;

use super::error::TransportError;

/// One inbound event from a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// A text message
    Text(String),
    /// A frame the relay does not act on (binary, ping, pong)
    Ignored,
    /// The stream ended, either by a close frame or by the peer going away
    End,
}

/// Outbound half of a client stream.
///
/// Implementations must tolerate concurrent callers; sends to the same client
/// are serialized by the implementation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Send one text message. May wait indefinitely on a stalled peer.
    async fn send_text(&self, text: String) -> Result<(), TransportError>;

    /// Close the stream.
    async fn close(&self) -> Result<(), TransportError>;
}

/// Inbound half of a client stream.
#[async_trait]
pub trait MessageSource: Send {
    /// Wait for the next inbound event.
    ///
    /// `Err` means a receive error that did not end the stream.
    async fn recv(&mut self) -> Result<Inbound, TransportError>;
}
