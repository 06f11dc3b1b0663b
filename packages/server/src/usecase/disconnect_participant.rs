//! UseCase: 切断処理
//!
//! レジストリから登録を解除し、その後ストリームを閉じます。
//! 登録解除とクローズは常に両方実行されます。

use std::sync::Arc;

use crate::domain::{Connection, ConnectionRegistry};

use super::error::DisconnectError;

/// 切断のユースケース
pub struct DisconnectParticipantUseCase {
    /// 接続レジストリ
    registry: Arc<dyn ConnectionRegistry>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// 切断を実行
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 登録解除とクローズが完了
    /// * `Err(DisconnectError)` - クローズに失敗（登録解除は完了している）
    pub async fn execute(&self, connection: &Connection) -> Result<(), DisconnectError> {
        if !self.registry.remove(connection.id()).await {
            tracing::warn!(
                "Connection '{}' was not registered at disconnect",
                connection.id()
            );
        }

        connection.close().await.map_err(DisconnectError::CloseFailed)
    }

    /// 残りの接続数を取得
    pub async fn count_remaining_connections(&self) -> usize {
        self.registry.count_connections().await
    }
}
