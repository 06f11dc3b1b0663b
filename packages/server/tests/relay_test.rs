//! Integration tests for the relay server over real WebSocket connections.

use std::{net::SocketAddr, time::Duration};

use futures_util::{SinkExt, StreamExt};
use murmur_server::{config::ServerConfig, domain::Envelope, ui::Server};
use tokio::{
    net::{TcpListener, TcpStream},
    sync::oneshot,
    time::timeout,
};
use tokio_tungstenite::{WebSocketStream, client_async, tungstenite::protocol::Message};

const RECV_TIMEOUT: Duration = Duration::from_secs(2);
const SILENCE: Duration = Duration::from_millis(200);

/// Helper struct to manage the in-process server lifecycle
struct TestServer {
    addr: SocketAddr,
    path: String,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    /// Start a server on an ephemeral port
    async fn start() -> Self {
        Self::start_with(ServerConfig::default()).await
    }

    async fn start_with(config: ServerConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let path = config.path.clone();
        let server = Server::from_config(config).unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let shutdown = async move {
                let _ = shutdown_rx.await;
            };
            let _ = server.serve(listener, shutdown).await;
        });

        TestServer {
            addr,
            path,
            shutdown: Some(shutdown_tx),
        }
    }

    /// Get the WebSocket URL for this server
    fn url(&self) -> String {
        format!("ws://{}{}", self.addr, self.path)
    }

    async fn health(&self) -> serde_json::Value {
        reqwest::get(format!("http://{}/api/health", self.addr))
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }

    /// Poll the health endpoint until the registry holds `expected` connections
    async fn wait_for_connections(&self, expected: u64) {
        timeout(RECV_TIMEOUT, async {
            loop {
                if self.health().await["connections"] == expected {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

/// Helper struct for one WebSocket client
struct TestClient {
    ws: WebSocketStream<TcpStream>,
    /// The address the server sees for this client
    local_addr: SocketAddr,
}

impl TestClient {
    async fn connect(server: &TestServer) -> Self {
        let stream = TcpStream::connect(server.addr).await.unwrap();
        let local_addr = stream.local_addr().unwrap();
        let (ws, _response) = client_async(server.url(), stream).await.unwrap();
        TestClient { ws, local_addr }
    }

    /// Connect, consume the greeting and wait until registered
    async fn join(server: &TestServer, expected_connections: u64) -> Self {
        let mut client = Self::connect(server).await;
        let greeting = client.next_envelope().await;
        assert!(greeting.is_from_server());
        server.wait_for_connections(expected_connections).await;
        client
    }

    async fn send_text(&mut self, text: &str) {
        self.ws.send(Message::text(text.to_string())).await.unwrap();
    }

    async fn next_envelope(&mut self) -> Envelope {
        loop {
            let message = timeout(RECV_TIMEOUT, self.ws.next())
                .await
                .expect("timed out waiting for a message")
                .expect("stream ended")
                .expect("websocket error");
            if let Message::Text(text) = message {
                return Envelope::decode(text.as_str()).unwrap();
            }
        }
    }

    /// Assert that no text message arrives within a short window
    async fn assert_silent(&mut self) {
        let result = timeout(SILENCE, async {
            loop {
                match self.ws.next().await {
                    Some(Ok(Message::Text(text))) => return Some(text.to_string()),
                    Some(Ok(_)) => continue,
                    _ => return None,
                }
            }
        })
        .await;
        assert!(
            !matches!(result, Ok(Some(_))),
            "unexpected message: {:?}",
            result
        );
    }

    async fn close(mut self) {
        self.ws.close(None).await.unwrap();
    }
}

#[tokio::test]
async fn test_client_receives_exactly_one_greeting() {
    // テスト項目: 接続したクライアントは SERVER からのグリーティングを 1 回だけ受け取る
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let mut client = TestClient::connect(&server).await;

    // then (期待する結果):
    let greeting = client.next_envelope().await;
    assert_eq!(greeting.name, "SERVER");
    assert_eq!(greeting.message, "Hello Client!");
    assert!(greeting.id.starts_with("SERVER-"));
    client.assert_silent().await;
}

#[tokio::test]
async fn test_message_is_relayed_to_every_other_client() {
    // テスト項目: A, B, C が接続し A が "hi" を送ると、B と C だけが受け取る
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::join(&server, 1).await;
    let mut bob = TestClient::join(&server, 2).await;
    let mut charlie = TestClient::join(&server, 3).await;

    // when (操作):
    alice.send_text("hi").await;

    // then (期待する結果):
    for client in [&mut bob, &mut charlie] {
        let envelope = client.next_envelope().await;
        assert_eq!(envelope.name, alice.local_addr.to_string());
        assert_eq!(envelope.message, "hi");
    }
    alice.assert_silent().await;
    bob.assert_silent().await;
    charlie.assert_silent().await;
}

#[tokio::test]
async fn test_disconnected_client_is_removed() {
    // テスト項目: A が切断した後に B が送信しても、エラーにならず誰にも届かない
    // given (前提条件):
    let server = TestServer::start().await;
    let alice = TestClient::join(&server, 1).await;
    alice.close().await;
    server.wait_for_connections(0).await;

    // when (操作):
    let mut bob = TestClient::join(&server, 1).await;
    bob.send_text("anyone?").await;

    // then (期待する結果):
    bob.assert_silent().await;
    let health = server.health().await;
    assert_eq!(health["status"], "ok");
    assert_eq!(health["connections"], 1);
}

#[tokio::test]
async fn test_quotes_and_newlines_survive_relay() {
    // テスト項目: 引用符や改行を含むメッセージがエスケープされ、そのまま届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::join(&server, 1).await;
    let mut bob = TestClient::join(&server, 2).await;
    let text = "she said \"hi\"\nthen {\"left\"}";

    // when (操作):
    alice.send_text(text).await;

    // then (期待する結果):
    let envelope = bob.next_envelope().await;
    assert_eq!(envelope.message, text);
}

#[tokio::test]
async fn test_binary_frames_are_not_relayed() {
    // テスト項目: バイナリフレームは中継されず、その後のテキストは中継される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::join(&server, 1).await;
    let mut bob = TestClient::join(&server, 2).await;

    // when (操作):
    alice
        .ws
        .send(Message::binary(vec![1u8, 2, 3]))
        .await
        .unwrap();
    alice.send_text("after binary").await;

    // then (期待する結果):
    let envelope = bob.next_envelope().await;
    assert_eq!(envelope.message, "after binary");
    bob.assert_silent().await;
}

#[tokio::test]
async fn test_custom_path_and_greeting() {
    // テスト項目: 設定したパスとグリーティングが使われる
    // given (前提条件):
    let server = TestServer::start_with(ServerConfig {
        path: "/chat".to_string(),
        greeting: "Welcome!".to_string(),
        ..ServerConfig::default()
    })
    .await;

    // when (操作):
    let mut client = TestClient::connect(&server).await;

    // then (期待する結果):
    let greeting = client.next_envelope().await;
    assert_eq!(greeting.message, "Welcome!");
}

#[tokio::test]
async fn test_health_endpoint_reports_connections() {
    // テスト項目: ヘルスチェックが接続数を返す
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let before = server.health().await;
    let _alice = TestClient::join(&server, 1).await;
    let _bob = TestClient::join(&server, 2).await;
    let after = server.health().await;

    // then (期待する結果):
    assert_eq!(before["status"], "ok");
    assert_eq!(before["connections"], 0);
    assert_eq!(after["connections"], 2);
}

#[tokio::test]
async fn test_abrupt_disconnect_is_cleaned_up() {
    // テスト項目: クローズフレームを送らずに切断したクライアントも登録解除され、中継は続く
    // given (前提条件):
    let server = TestServer::start().await;
    let alice = TestClient::join(&server, 1).await;
    let mut bob = TestClient::join(&server, 2).await;
    let mut charlie = TestClient::join(&server, 3).await;

    // when (操作):
    drop(alice);
    server.wait_for_connections(2).await;
    bob.send_text("still here").await;

    // then (期待する結果):
    let envelope = charlie.next_envelope().await;
    assert_eq!(envelope.message, "still here");
    assert_eq!(server.health().await["connections"], 2);
}
