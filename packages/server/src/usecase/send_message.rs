//! UseCase: メッセージのブロードキャスト処理
//!
//! ## 概要
//!
//! 送信者以外の全ての登録済み接続に、受信したメッセージをエンベロープに包んで配信します。
//!
//! - 受信者ごとに 1 つのタスクを `JoinSet` で起動し、全タスクの完了を待ってから返ります
//! - ある受信者への送信失敗はログに記録されるだけで、他の受信者への配信には影響しません
//! - タイムアウトはありません。停止した受信者がいると、その送信が解決するまで戻りません
//!
//! ## テスト実装の作業記録
//!
//! ### どのような状況を想定しているか
//! - 正常系：送信者以外の全員に 1 回ずつ届く
//! - 異常系：一部の受信者への送信失敗・パニック
//! - エッジケース：送信者しかいない場合、切断済みの接続、停止した受信者

use std::sync::Arc;

use murmur_shared::time::Clock;
use tokio::task::JoinSet;

use crate::domain::{Connection, ConnectionId, ConnectionRegistry, Envelope, TransportError};

use super::error::SendMessageError;

/// Outcome of one broadcast, collected after every delivery task has finished.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Recipients whose send completed successfully
    pub delivered: Vec<ConnectionId>,
    /// Recipients whose send returned an error, with that error
    pub failed: Vec<(ConnectionId, TransportError)>,
    /// Delivery tasks that panicked
    pub panicked: usize,
}

impl BroadcastReport {
    pub fn recipient_count(&self) -> usize {
        self.delivered.len() + self.failed.len() + self.panicked
    }

    pub fn is_empty(&self) -> bool {
        self.recipient_count() == 0
    }
}

/// メッセージ送信（ブロードキャスト）のユースケース
pub struct SendMessageUseCase {
    /// 接続レジストリ
    registry: Arc<dyn ConnectionRegistry>,
    /// エンベロープの id に埋め込む時刻の取得元
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(registry: Arc<dyn ConnectionRegistry>, clock: Arc<dyn Clock>) -> Self {
        Self { registry, clock }
    }

    /// `payload` を `sender` 以外の全ての接続にブロードキャストする
    ///
    /// # Arguments
    ///
    /// * `sender` - 送信者の接続（配信対象から除外される）
    /// * `payload` - 受信したテキストそのもの
    ///
    /// # Returns
    ///
    /// * `Ok(BroadcastReport)` - 全ての配信タスクが完了した後の結果
    /// * `Err(SendMessageError)` - エンベロープのエンコードに失敗
    pub async fn execute(
        &self,
        sender: &Connection,
        payload: &str,
    ) -> Result<BroadcastReport, SendMessageError> {
        let recipients: Vec<Arc<Connection>> = self
            .registry
            .snapshot()
            .await
            .into_iter()
            .filter(|connection| connection.id() != sender.id())
            .collect();

        if recipients.is_empty() {
            tracing::debug!("No other connections, nothing to relay from '{}'", sender.id());
            return Ok(BroadcastReport::default());
        }

        let text = Envelope::chat(sender, payload, self.clock.now_millis()).encode()?;

        let mut deliveries = JoinSet::new();
        for recipient in recipients {
            let text = text.clone();
            deliveries.spawn(async move {
                let result = recipient.send_text(text).await;
                (recipient, result)
            });
        }

        let mut report = BroadcastReport::default();
        while let Some(joined) = deliveries.join_next().await {
            match joined {
                Ok((recipient, Ok(()))) => {
                    tracing::debug!("Relayed message to '{}'", recipient.id());
                    report.delivered.push(recipient.id().clone());
                }
                Ok((recipient, Err(e))) => {
                    tracing::warn!(
                        "Failed to relay message to '{}' ({}): {}",
                        recipient.id(),
                        recipient.remote_addr(),
                        e
                    );
                    report.failed.push((recipient.id().clone(), e));
                }
                Err(e) => {
                    tracing::error!("Delivery task failed: {}", e);
                    report.panicked += 1;
                }
            }
        }

        tracing::debug!(
            "Broadcast from '{}' finished: {} delivered, {} failed, {} panicked",
            sender.id(),
            report.delivered.len(),
            report.failed.len(),
            report.panicked
        );

        Ok(report)
    }
}
