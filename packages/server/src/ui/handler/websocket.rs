//! WebSocket connection handlers.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{
        ConnectInfo, State,
        ws::{WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::stream::StreamExt;

use crate::{
    domain::{Connection, ConnectionIdFactory},
    infrastructure::transport::{WebSocketSink, WebSocketSource},
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    ConnectInfo(remote_addr): ConnectInfo<SocketAddr>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    tracing::debug!("Upgrade requested from {}", remote_addr);
    ws.on_upgrade(move |socket| handle_socket(socket, state, remote_addr))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, remote_addr: SocketAddr) {
    let (sender, receiver) = socket.split();

    let connection = Arc::new(Connection::new(
        ConnectionIdFactory::generate(),
        remote_addr.to_string(),
        Arc::new(WebSocketSink::new(sender)),
    ));

    state
        .connection_handler
        .run(connection, WebSocketSource::new(receiver))
        .await;
}
