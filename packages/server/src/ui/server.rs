//! Server execution logic.

use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::{Router, routing::get};
use murmur_shared::time::SystemClock;
use tokio::net::TcpListener;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::{
    config::ServerConfig,
    domain::ConnectionRegistry,
    infrastructure::registry::InMemoryConnectionRegistry,
    usecase::{
        ConnectParticipantUseCase, ConnectionHandler, DisconnectParticipantUseCase,
        SendMessageUseCase,
    },
};

use super::{
    HEALTH_PATH,
    error::ServerError,
    handler::{health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket relay server
///
/// # Example
///
/// ```ignore
/// let server = Server::from_config(ServerConfig::default())?;
/// server.run().await?;
/// ```
pub struct Server {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl Server {
    /// Create a new Server from already wired components.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(
        config: ServerConfig,
        connection_handler: ConnectionHandler,
        registry: Arc<dyn ConnectionRegistry>,
    ) -> Result<Self, ServerError> {
        config.validate()?;
        let state = Arc::new(AppState {
            connection_handler,
            registry,
        });
        Ok(Self { config, state })
    }

    /// Wire the default components for `config` and create a Server.
    pub fn from_config(config: ServerConfig) -> Result<Self, ServerError> {
        // 1. Registry
        let registry: Arc<dyn ConnectionRegistry> = Arc::new(InMemoryConnectionRegistry::new());
        let clock = Arc::new(SystemClock);

        // 2. UseCases
        let connect_participant_usecase = Arc::new(ConnectParticipantUseCase::new(
            registry.clone(),
            clock.clone(),
            config.greeting.clone(),
        ));
        let send_message_usecase = Arc::new(SendMessageUseCase::new(registry.clone(), clock));
        let disconnect_participant_usecase =
            Arc::new(DisconnectParticipantUseCase::new(registry.clone()));

        // 3. Connection handler
        let connection_handler = ConnectionHandler::new(
            connect_participant_usecase,
            send_message_usecase,
            disconnect_participant_usecase,
            config.max_receive_errors,
        );

        Self::new(config, connection_handler, registry)
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the axum router.
    pub fn router(&self) -> Router {
        let routes = Router::new()
            // WebSocket エンドポイント
            .route(&self.config.path, get(websocket_handler))
            // HTTP エンドポイント
            .route(HEALTH_PATH, get(health_check))
            .with_state(self.state.clone());
        with_middleware(routes)
    }

    /// Bind the configured address and serve until Ctrl+C / SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the configured address
    /// or if there's an error during server execution.
    pub async fn run(self) -> Result<(), ServerError> {
        let bind_addr = self.config.bind_addr();
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: bind_addr.clone(),
                source,
            })?;

        tracing::info!("Press Ctrl+C to shutdown gracefully");
        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local_addr = listener.local_addr()?;
        tracing::info!("Relay server listening on {}", local_addr);
        tracing::info!("Connect to: ws://{}{}", local_addr, self.config.path);

        let app = self.router();
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Request tracing plus panic recovery: a panicking handler answers 500.
fn with_middleware(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
}
