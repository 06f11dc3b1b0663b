//! Client execution logic with reconnection support.

use std::time::Duration;

use tokio::sync::mpsc;

use super::{error::ClientError, session::run_client_session, ui::spawn_line_reader};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Run the terminal client with reconnection logic
pub async fn run_client(url: String) -> Result<(), ClientError> {
    let mut input_rx = spawn_line_reader();
    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} (attempt {}/{})",
            url,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        match run_client_session(&url, &mut input_rx).await {
            Ok(()) => {
                // User exit, don't reconnect
                tracing::info!("Client session ended normally");
                break;
            }
            Err(e) => {
                tracing::warn!("{}", e);
                reconnect_count += 1;

                if reconnect_count >= MAX_RECONNECT_ATTEMPTS {
                    return Err(ClientError::ReconnectFailed(MAX_RECONNECT_ATTEMPTS));
                }

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    reconnect_count + 1,
                    MAX_RECONNECT_ATTEMPTS
                );

                println!("\nDisconnected. Lines typed before reconnecting will not be sent.");
                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;

                let discarded = discard_pending_input(&mut input_rx);
                if discarded > 0 {
                    tracing::info!("Discarded {} line(s) typed while disconnected", discarded);
                }
            }
        }
    }

    Ok(())
}

/// Drop every line already queued on `input_rx`. Returns how many were dropped.
fn discard_pending_input(input_rx: &mut mpsc::UnboundedReceiver<String>) -> usize {
    let mut discarded = 0;
    while input_rx.try_recv().is_ok() {
        discarded += 1;
    }
    discarded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discard_pending_input_drops_queued_lines() {
        // テスト項目: 切断中に入力された行は破棄され、その後の入力は残る
        // given (前提条件):
        let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();
        input_tx.send("typed while offline".to_string()).unwrap();
        input_tx.send("also offline".to_string()).unwrap();

        // when (操作):
        let discarded = discard_pending_input(&mut input_rx);
        input_tx.send("after reconnect".to_string()).unwrap();

        // then (期待する結果):
        assert_eq!(discarded, 2);
        assert_eq!(input_rx.try_recv().unwrap(), "after reconnect");
    }

    #[test]
    fn test_discard_pending_input_on_empty_or_closed_channel() {
        // テスト項目: 空のチャネルや閉じたチャネルでは何も破棄しない
        // given (前提条件):
        let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

        // when (操作):
        let empty = discard_pending_input(&mut input_rx);
        drop(input_tx);
        let closed = discard_pending_input(&mut input_rx);

        // then (期待する結果):
        assert_eq!(empty, 0);
        assert_eq!(closed, 0);
    }
}
