//! Transport implementations of `MessageSink` / `MessageSource`.
//!
//! - `websocket`: axum WebSocket halves
//! - `channel`: tokio mpsc channels, for embedding the relay in-process and for tests

pub mod channel;
pub mod websocket;

pub use channel::{ChannelSink, ChannelSource};
pub use websocket::{WebSocketSink, WebSocketSource};
