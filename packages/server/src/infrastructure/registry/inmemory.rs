//! InMemory ConnectionRegistry 実装
//!
//! ドメイン層が定義する ConnectionRegistry trait の具体的な実装。
//! HashMap を単一の `tokio::sync::Mutex` で保護します。
//!
//! ## 設計ノート
//!
//! 追加・削除だけでなく、ブロードキャスト用のスナップショット取得も同じロックの
//! 内側で行います。スナップショットは `Arc<Connection>` のコピーなので、
//! ロックを解放した後のイテレーション中に他の接続が登録・削除されても競合しません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Connection, ConnectionId, ConnectionRegistry};

/// インメモリ ConnectionRegistry 実装
#[derive(Default)]
pub struct InMemoryConnectionRegistry {
    /// Key: ConnectionId, Value: 接続
    connections: Mutex<HashMap<ConnectionId, Arc<Connection>>>,
}

impl InMemoryConnectionRegistry {
    /// 空の InMemoryConnectionRegistry を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn add(&self, connection: Arc<Connection>) {
        let id = connection.id().clone();
        let mut connections = self.connections.lock().await;
        if connections.insert(id.clone(), connection).is_some() {
            tracing::warn!("Connection '{}' was already registered, replaced", id);
        }
        tracing::debug!(
            "Connection '{}' registered ({} active)",
            id,
            connections.len()
        );
    }

    async fn remove(&self, id: &ConnectionId) -> bool {
        let mut connections = self.connections.lock().await;
        let removed = connections.remove(id).is_some();
        tracing::debug!(
            "Connection '{}' unregistered (present: {}, {} active)",
            id,
            removed,
            connections.len()
        );
        removed
    }

    async fn snapshot(&self) -> Vec<Arc<Connection>> {
        let connections = self.connections.lock().await;
        connections.values().cloned().collect()
    }

    async fn count_connections(&self) -> usize {
        self.connections.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::transport::MockMessageSink;

    fn create_test_connection(id: &str) -> Arc<Connection> {
        Arc::new(Connection::new(
            ConnectionId::new(id.to_string()).unwrap(),
            "127.0.0.1:9000".to_string(),
            Arc::new(MockMessageSink::new()),
        ))
    }

    #[tokio::test]
    async fn test_add_and_snapshot() {
        // テスト項目: 追加した接続がスナップショットに含まれる
        // given (前提条件):
        let registry = InMemoryConnectionRegistry::new();

        // when (操作):
        registry.add(create_test_connection("alice")).await;
        registry.add(create_test_connection("bob")).await;

        // then (期待する結果):
        let mut ids: Vec<String> = registry
            .snapshot()
            .await
            .iter()
            .map(|c| c.id().to_string())
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["alice", "bob"]);
        assert_eq!(registry.count_connections().await, 2);
    }

    #[tokio::test]
    async fn test_remove_present_and_absent() {
        // テスト項目: 登録済みの接続は削除でき、未登録の削除は何もしない
        // given (前提条件):
        let registry = InMemoryConnectionRegistry::new();
        let alice = create_test_connection("alice");
        registry.add(alice.clone()).await;

        // when (操作):
        let first = registry.remove(alice.id()).await;
        let second = registry.remove(alice.id()).await;

        // then (期待する結果):
        assert!(first);
        assert!(!second);
        assert_eq!(registry.count_connections().await, 0);
        assert!(registry.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_add_same_id_twice_keeps_one_entry() {
        // テスト項目: 同じ ID を二度追加しても重複しない
        // given (前提条件):
        let registry = InMemoryConnectionRegistry::new();

        // when (操作):
        registry.add(create_test_connection("alice")).await;
        registry.add(create_test_connection("alice")).await;

        // then (期待する結果):
        assert_eq!(registry.count_connections().await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_lose_nothing() {
        // テスト項目: N 個の並行追加の後、サイズがちょうど N になる
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let n = 200;

        // when (操作):
        let handles: Vec<_> = (0..n)
            .map(|i| {
                let registry = registry.clone();
                tokio::spawn(async move {
                    registry
                        .add(create_test_connection(&format!("conn-{i}")))
                        .await;
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        // then (期待する結果):
        assert_eq!(registry.count_connections().await, n);
        let mut ids: Vec<String> = registry
            .snapshot()
            .await
            .iter()
            .map(|c| c.id().to_string())
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), n);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_snapshot_while_removing_concurrently() {
        // テスト項目: 並行削除中にスナップショットを取得しても競合せず、最終的に空になる
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let connections: Vec<_> = (0..100)
            .map(|i| create_test_connection(&format!("conn-{i}")))
            .collect();
        for connection in &connections {
            registry.add(connection.clone()).await;
        }

        // when (操作):
        let remover = {
            let registry = registry.clone();
            tokio::spawn(async move {
                for connection in connections {
                    registry.remove(connection.id()).await;
                }
            })
        };
        let reader = {
            let registry = registry.clone();
            tokio::spawn(async move {
                let mut sizes = Vec::new();
                for _ in 0..50 {
                    sizes.push(registry.snapshot().await.len());
                    tokio::task::yield_now().await;
                }
                sizes
            })
        };
        remover.await.unwrap();
        let sizes = reader.await.unwrap();

        // then (期待する結果):
        assert!(sizes.iter().all(|size| *size <= 100));
        assert!(sizes.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(registry.count_connections().await, 0);
    }
}
