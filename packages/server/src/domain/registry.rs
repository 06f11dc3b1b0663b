//! ConnectionRegistry trait.
//!
//! The authoritative set of active connections. Implementations own their
//! synchronization: `add`, `remove` and `snapshot` are mutually exclusive, and
//! a snapshot is a copy, so callers may iterate it while other connections
//! register or leave.

use std::sync::Arc;

use async_trait::async_trait;

use super::{connection::Connection, value_object::ConnectionId};

#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// Insert a connection into the active set.
    async fn add(&self, connection: Arc<Connection>);

    /// Remove a connection. Returns `false` if it was not registered.
    async fn remove(&self, id: &ConnectionId) -> bool;

    /// Copy out the current active set.
    async fn snapshot(&self) -> Vec<Arc<Connection>>;

    /// Number of active connections.
    async fn count_connections(&self) -> usize;
}
