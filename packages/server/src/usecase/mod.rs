//! UseCase layer.
//!
//! - `connect_participant`: greeting + registration
//! - `send_message`: concurrent fan-out to every other connection
//! - `disconnect_participant`: deregistration + close
//! - `handle_connection`: per-connection control loop tying the three together

mod connect_participant;
mod disconnect_participant;
mod error;
mod handle_connection;
mod send_message;

pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{ConnectError, DisconnectError, SendMessageError};
pub use handle_connection::{ConnectionHandler, SessionEnd};
pub use send_message::{BroadcastReport, SendMessageUseCase};
