//! Murmur relay server library.
//!
//! Clients hold a WebSocket open, send text messages, and the relay fans each
//! message out to every other connected client.
//!
//! The crate is split into layers:
//! - `domain`: connection identity, transport traits, the envelope, registry trait
//! - `infrastructure`: in-memory registry and the WebSocket / channel transports
//! - `usecase`: connect, broadcast, disconnect and the per-connection handler
//! - `ui`: axum routes, handlers and the server runner

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
