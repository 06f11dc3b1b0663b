//! Server state shared by the handlers.

use std::sync::Arc;

use crate::{domain::ConnectionRegistry, usecase::ConnectionHandler};

/// Shared application state
pub struct AppState {
    /// Per-connection control loop
    pub connection_handler: ConnectionHandler,
    /// Active connections (read by the health endpoint)
    pub registry: Arc<dyn ConnectionRegistry>,
}
