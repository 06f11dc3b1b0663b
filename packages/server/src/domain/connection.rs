//! Connection entity.

use std::{fmt, sync::Arc};

use super::{error::TransportError, transport::MessageSink, value_object::ConnectionId};

/// One client's outbound stream plus its identity.
///
/// The remote address is a display name only; the registry keys on `id`.
pub struct Connection {
    id: ConnectionId,
    remote_addr: String,
    sink: Arc<dyn MessageSink>,
}

impl Connection {
    pub fn new(id: ConnectionId, remote_addr: String, sink: Arc<dyn MessageSink>) -> Self {
        Self {
            id,
            remote_addr,
            sink,
        }
    }

    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    pub fn remote_addr(&self) -> &str {
        &self.remote_addr
    }

    pub async fn send_text(&self, text: String) -> Result<(), TransportError> {
        self.sink.send_text(text).await
    }

    pub async fn close(&self) -> Result<(), TransportError> {
        self.sink.close().await
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("remote_addr", &self.remote_addr)
            .finish_non_exhaustive()
    }
}
