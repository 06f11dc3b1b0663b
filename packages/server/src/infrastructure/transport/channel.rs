//! Channel を使った MessageSink / MessageSource 実装
//!
//! ネットワークを介さずにリレーを駆動するための実装です。
//! 送信側は `mpsc::UnboundedSender<String>` に書き込み、受信側はテストや
//! 組み込み側が送り込んだ `Inbound` を順に返します。

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};

use crate::domain::{Inbound, MessageSink, MessageSource, TransportError};

/// Sink that forwards outbound text into an unbounded channel.
///
/// Closing drops the sender, so the paired receiver observes the end of the
/// stream once it has drained what was already sent.
pub struct ChannelSink {
    sender: Mutex<Option<mpsc::UnboundedSender<String>>>,
}

impl ChannelSink {
    /// Create a sink and the receiver that observes what is sent to it.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = Self {
            sender: Mutex::new(Some(tx)),
        };
        (sink, rx)
    }
}

#[async_trait]
impl MessageSink for ChannelSink {
    async fn send_text(&self, text: String) -> Result<(), TransportError> {
        let sender = self.sender.lock().await;
        let sender = sender.as_ref().ok_or(TransportError::Closed)?;
        sender.send(text).map_err(|_| TransportError::Closed)
    }

    async fn close(&self) -> Result<(), TransportError> {
        match self.sender.lock().await.take() {
            Some(_) => Ok(()),
            None => Err(TransportError::Close("already closed".to_string())),
        }
    }
}

/// Source fed from an unbounded channel.
///
/// Dropping every paired sender ends the stream.
pub struct ChannelSource {
    receiver: mpsc::UnboundedReceiver<Result<Inbound, TransportError>>,
}

impl ChannelSource {
    /// Create a source and the sender used to feed it.
    pub fn new() -> (Self, mpsc::UnboundedSender<Result<Inbound, TransportError>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { receiver: rx }, tx)
    }
}

#[async_trait]
impl MessageSource for ChannelSource {
    async fn recv(&mut self) -> Result<Inbound, TransportError> {
        self.receiver.recv().await.unwrap_or(Ok(Inbound::End))
    }
}
