//! WebSocket relay server.
//!
//! Every text message a client sends is relayed to all other connected clients.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin murmur-server
//! cargo run --bin murmur-server -- --host 0.0.0.0 --port 3000 --path /chat
//! ```

use clap::Parser;
use murmur_server::{
    config::{
        DEFAULT_HOST, DEFAULT_MAX_RECEIVE_ERRORS, DEFAULT_PATH, DEFAULT_PORT, ServerConfig,
    },
    domain::envelope::DEFAULT_GREETING,
    ui::Server,
};
use murmur_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "murmur-server")]
#[command(about = "WebSocket relay that fans each message out to every other client", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = DEFAULT_HOST)]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Path of the WebSocket endpoint
    #[arg(long, default_value = DEFAULT_PATH)]
    path: String,

    /// Greeting sent to every new connection
    #[arg(long, default_value = DEFAULT_GREETING)]
    greeting: String,

    /// Consecutive receive errors tolerated before closing a connection (0 = unlimited)
    #[arg(long, default_value_t = DEFAULT_MAX_RECEIVE_ERRORS)]
    max_receive_errors: u32,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            path: args.path,
            greeting: args.greeting,
            max_receive_errors: args.max_receive_errors,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    let server = match Server::from_config(args.into()) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
