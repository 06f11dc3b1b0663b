//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use murmur_server::domain::Envelope;
use murmur_shared::time::get_unix_timestamp_millis;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use super::{error::ClientError, formatter::MessageFormatter, ui::redisplay_prompt};

/// Run one WebSocket session against the relay.
///
/// Lines arriving on `input_rx` are sent as raw text frames. The receiver is
/// borrowed so the same input stream survives reconnects.
///
/// Returns `Ok(())` when the input stream closes (the user quit) and
/// `Err(ClientError::ConnectionLost)` when the server side goes away.
pub async fn run_client_session(
    url: &str,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::Connection(e.to_string()))?;

    tracing::info!("Connected to relay at {}", url);
    println!("\nType messages and press Enter to send. Press Ctrl+C to exit.\n");

    let (mut write, mut read) = ws_stream.split();

    // Spawn a task to handle incoming messages
    let mut read_task = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let formatted = match Envelope::decode(text.as_str()) {
                        Ok(envelope) => {
                            MessageFormatter::format_envelope(&envelope, get_unix_timestamp_millis())
                        }
                        Err(_) => MessageFormatter::format_raw_message(text.as_str()),
                    };
                    print!("{}", formatted);
                    redisplay_prompt();
                }
                Ok(Message::Binary(data)) => {
                    print!("{}", MessageFormatter::format_binary_message(data.len()));
                    redisplay_prompt();
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    let write_loop = async {
        while let Some(line) = input_rx.recv().await {
            if let Err(e) = write.send(Message::text(line.clone())).await {
                tracing::warn!("Failed to send message: {}", e);
                return Err(ClientError::ConnectionLost);
            }

            print!(
                "{}",
                MessageFormatter::format_sent(&line, get_unix_timestamp_millis())
            );
            redisplay_prompt();
        }

        // Input closed: say goodbye to the server
        if let Err(e) = write.close().await {
            tracing::debug!("Failed to close connection cleanly: {}", e);
        }
        Ok(())
    };

    // Whichever side finishes first ends the session
    tokio::select! {
        _ = &mut read_task => Err(ClientError::ConnectionLost),
        result = write_loop => {
            read_task.abort();
            result
        }
    }
}
