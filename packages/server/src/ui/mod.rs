//! Relay server UI layer: axum routes, handlers and the server runner.

mod error;
mod handler;
mod server;
mod signal;
pub mod state;

pub use error::ServerError;
pub use server::Server;

/// Path of the health check endpoint.
pub const HEALTH_PATH: &str = "/api/health";
