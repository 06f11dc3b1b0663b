//! Terminal client for the Murmur relay.
//!
//! Connects to the relay, prints every message it delivers and sends each line
//! typed at the `>` prompt. Reconnects on disconnection (max 5 attempts with a
//! 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin murmur-client
//! cargo run --bin murmur-client -- --url ws://127.0.0.1:1323/ws
//! ```

use clap::Parser;

use murmur_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "murmur-client")]
#[command(about = "Terminal client for the Murmur message relay", long_about = None)]
struct Args {
    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:1323/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = murmur_client::run_client(args.url).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
