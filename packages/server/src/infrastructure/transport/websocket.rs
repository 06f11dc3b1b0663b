//! WebSocket を使った MessageSink / MessageSource 実装
//!
//! ## 責務
//!
//! - 送信側 (`SplitSink`) を Mutex で保護し、複数の送信者から安全に書き込む
//! - 受信側 (`SplitStream`) のフレームを `Inbound` に変換する
//!
//! ## 設計ノート
//!
//! WebSocket の生成（アップグレード）は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は分割されたソケットの両端を受け取ります。

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::{self, error::ProtocolError};

use crate::domain::{Inbound, MessageSink, MessageSource, TransportError};

/// Outbound half of an axum WebSocket.
pub struct WebSocketSink {
    sink: Mutex<SplitSink<WebSocket, Message>>,
}

impl WebSocketSink {
    pub fn new(sink: SplitSink<WebSocket, Message>) -> Self {
        Self {
            sink: Mutex::new(sink),
        }
    }
}

#[async_trait]
impl MessageSink for WebSocketSink {
    async fn send_text(&self, text: String) -> Result<(), TransportError> {
        let mut sink = self.sink.lock().await;
        sink.send(Message::Text(text.into()))
            .await
            .map_err(|e| TransportError::Send(e.to_string()))
    }

    async fn close(&self) -> Result<(), TransportError> {
        let mut sink = self.sink.lock().await;
        sink.close()
            .await
            .map_err(|e| TransportError::Close(e.to_string()))
    }
}

/// Inbound half of an axum WebSocket.
pub struct WebSocketSource {
    stream: SplitStream<WebSocket>,
}

impl WebSocketSource {
    pub fn new(stream: SplitStream<WebSocket>) -> Self {
        Self { stream }
    }
}

#[async_trait]
impl MessageSource for WebSocketSource {
    async fn recv(&mut self) -> Result<Inbound, TransportError> {
        match self.stream.next().await {
            None => Ok(Inbound::End),
            Some(Ok(Message::Text(text))) => Ok(Inbound::Text(text.as_str().to_owned())),
            Some(Ok(Message::Close(frame))) => {
                tracing::debug!("Received close frame: {:?}", frame);
                Ok(Inbound::End)
            }
            // Pings are answered by the protocol layer
            Some(Ok(Message::Binary(_) | Message::Ping(_) | Message::Pong(_))) => {
                Ok(Inbound::Ignored)
            }
            Some(Err(e)) => {
                let error = e.into_inner();
                if is_peer_gone(error.as_ref()) {
                    tracing::debug!("Peer went away without a close frame: {}", error);
                    Ok(Inbound::End)
                } else {
                    Err(TransportError::Receive(error.to_string()))
                }
            }
        }
    }
}

/// Whether a receive error only means the client disconnected abruptly.
fn is_peer_gone(error: &(dyn std::error::Error + Send + Sync + 'static)) -> bool {
    match error.downcast_ref::<tungstenite::Error>() {
        Some(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => true,
        Some(tungstenite::Error::Protocol(ProtocolError::ResetWithoutClosingHandshake)) => true,
        Some(tungstenite::Error::Io(e)) => matches!(
            e.kind(),
            std::io::ErrorKind::ConnectionReset
                | std::io::ErrorKind::ConnectionAborted
                | std::io::ErrorKind::BrokenPipe
                | std::io::ErrorKind::UnexpectedEof
        ),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abrupt_disconnect_is_recognized() {
        // テスト項目: クローズフレームなしの切断はピアの離脱として扱われる
        // given (前提条件):
        let reset = tungstenite::Error::Protocol(ProtocolError::ResetWithoutClosingHandshake);
        let closed = tungstenite::Error::ConnectionClosed;
        let io_reset = tungstenite::Error::Io(std::io::Error::from(
            std::io::ErrorKind::ConnectionReset,
        ));

        // when (操作) / then (期待する結果):
        assert!(is_peer_gone(&reset));
        assert!(is_peer_gone(&closed));
        assert!(is_peer_gone(&io_reset));
    }

    #[test]
    fn test_other_receive_errors_are_not_disconnects() {
        // テスト項目: その他の受信エラーは切断として扱われない
        // given (前提条件):
        let invalid_utf8 = tungstenite::Error::Utf8("invalid utf-8".to_string());
        let unrelated = std::io::Error::other("not a websocket error");

        // when (操作) / then (期待する結果):
        assert!(!is_peer_gone(&invalid_utf8));
        assert!(!is_peer_gone(&unrelated));
    }
}
