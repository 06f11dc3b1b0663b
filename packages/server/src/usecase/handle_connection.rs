//! UseCase: 接続ごとの制御ループ
//!
//! ## 状態遷移
//!
//! ```text
//! Connecting --(グリーティング + 登録)--> Active --(ストリーム終了 / エラー上限)--> Closing --> Closed
//! ```
//!
//! - Active: 1 件受信するごとに SendMessageUseCase でブロードキャストする
//! - 受信エラーはログに記録してループを続ける。連続エラーが上限に達したら Closing へ
//! - Closing: 登録解除とクローズ。受信ループがパニックしても必ず実行される
//!
//! 受信ループは独立したタスクとして起動し、その終了（パニックを含む）を
//! JoinHandle で観測してから後始末を行います。

use std::sync::Arc;

use crate::domain::{Connection, Inbound, MessageSource};

use super::{
    connect_participant::ConnectParticipantUseCase,
    disconnect_participant::DisconnectParticipantUseCase, send_message::SendMessageUseCase,
};

/// How a connection's session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The client closed the stream or went away
    StreamEnded,
    /// Consecutive receive errors reached the configured ceiling
    TooManyReceiveErrors,
    /// The receive loop panicked or was cancelled
    Aborted,
}

/// Per-connection control loop.
///
/// Cheap to clone; all use cases are shared.
#[derive(Clone)]
pub struct ConnectionHandler {
    connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    send_message_usecase: Arc<SendMessageUseCase>,
    disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// Consecutive receive errors tolerated before closing; 0 disables the ceiling
    max_receive_errors: u32,
}

impl ConnectionHandler {
    pub fn new(
        connect_participant_usecase: Arc<ConnectParticipantUseCase>,
        send_message_usecase: Arc<SendMessageUseCase>,
        disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
        max_receive_errors: u32,
    ) -> Self {
        Self {
            connect_participant_usecase,
            send_message_usecase,
            disconnect_participant_usecase,
            max_receive_errors,
        }
    }

    /// Drive one connection from registration to close.
    ///
    /// Returns once the connection has been deregistered and closed.
    pub async fn run<S>(&self, connection: Arc<Connection>, source: S) -> SessionEnd
    where
        S: MessageSource + 'static,
    {
        // Connecting -> Active
        if let Err(e) = self
            .connect_participant_usecase
            .execute(connection.clone())
            .await
        {
            tracing::error!("Failed to greet '{}': {}", connection.id(), e);
        }
        tracing::info!(
            "Connection '{}' from {} registered",
            connection.id(),
            connection.remote_addr()
        );

        // Active
        let receive_loop = tokio::spawn(receive_loop(
            self.send_message_usecase.clone(),
            connection.clone(),
            source,
            self.max_receive_errors,
        ));
        let session_end = match receive_loop.await {
            Ok(session_end) => session_end,
            Err(e) => {
                tracing::error!(
                    "Receive loop for '{}' terminated abnormally: {}",
                    connection.id(),
                    e
                );
                SessionEnd::Aborted
            }
        };

        // Closing -> Closed
        if let Err(e) = self
            .disconnect_participant_usecase
            .execute(&connection)
            .await
        {
            tracing::warn!("Error while closing '{}': {}", connection.id(), e);
        }
        tracing::info!(
            "Connection '{}' from {} closed ({:?}, {} remaining)",
            connection.id(),
            connection.remote_addr(),
            session_end,
            self.disconnect_participant_usecase
                .count_remaining_connections()
                .await
        );

        session_end
    }
}

async fn receive_loop<S>(
    send_message_usecase: Arc<SendMessageUseCase>,
    connection: Arc<Connection>,
    mut source: S,
    max_receive_errors: u32,
) -> SessionEnd
where
    S: MessageSource,
{
    let mut consecutive_errors: u32 = 0;

    loop {
        match source.recv().await {
            Ok(Inbound::Text(text)) => {
                consecutive_errors = 0;
                tracing::debug!("Received from '{}': {}", connection.id(), text);
                if let Err(e) = send_message_usecase.execute(&connection, &text).await {
                    tracing::warn!("Failed to relay message from '{}': {}", connection.id(), e);
                }
            }
            Ok(Inbound::Ignored) => {
                consecutive_errors = 0;
                tracing::debug!("Ignored non-text frame from '{}'", connection.id());
            }
            Ok(Inbound::End) => {
                tracing::debug!("Stream from '{}' ended", connection.id());
                return SessionEnd::StreamEnded;
            }
            Err(e) => {
                consecutive_errors = consecutive_errors.saturating_add(1);
                tracing::error!(
                    "Receive error on '{}' ({} in a row): {}",
                    connection.id(),
                    consecutive_errors,
                    e
                );
                if max_receive_errors > 0 && consecutive_errors >= max_receive_errors {
                    tracing::warn!(
                        "Closing '{}' after {} consecutive receive errors",
                        connection.id(),
                        consecutive_errors
                    );
                    return SessionEnd::TooManyReceiveErrors;
                }
            }
        }
    }
}
