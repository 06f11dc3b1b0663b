//! UseCase: 接続処理
//!
//! 新しい接続にグリーティングを送り、レジストリに登録します。
//!
//! グリーティングは登録より先に送信します。登録後は他の接続からの
//! ブロードキャストが届き得るため、この順序でグリーティングが必ず最初の
//! メッセージになります。グリーティングの送信失敗は登録を妨げません。

use std::sync::Arc;

use murmur_shared::time::Clock;

use crate::domain::{Connection, ConnectionRegistry, Envelope};

use super::error::ConnectError;

/// 接続のユースケース
pub struct ConnectParticipantUseCase {
    /// 接続レジストリ
    registry: Arc<dyn ConnectionRegistry>,
    /// グリーティングの id に埋め込む時刻の取得元
    clock: Arc<dyn Clock>,
    /// グリーティングの本文
    greeting: String,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        clock: Arc<dyn Clock>,
        greeting: String,
    ) -> Self {
        Self {
            registry,
            clock,
            greeting,
        }
    }

    /// 接続を実行
    ///
    /// # Returns
    ///
    /// * `Ok(())` - グリーティング送信と登録が完了
    /// * `Err(ConnectError)` - グリーティングの送信に失敗（登録は完了している）
    pub async fn execute(&self, connection: Arc<Connection>) -> Result<(), ConnectError> {
        let greeted = match Envelope::greeting(self.greeting.as_str(), self.clock.now_millis())
            .encode()
        {
            Ok(text) => connection
                .send_text(text)
                .await
                .map_err(ConnectError::GreetingFailed),
            Err(e) => Err(ConnectError::from(e)),
        };

        self.registry.add(connection).await;

        greeted
    }
}
