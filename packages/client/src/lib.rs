//! Terminal client for the Murmur relay.
//!
//! Prints every envelope the relay delivers and sends each line typed at the
//! prompt as a chat message.

pub mod error;
pub mod formatter;
pub mod runner;
pub mod session;
pub mod ui;

pub use error::ClientError;
pub use runner::run_client;
