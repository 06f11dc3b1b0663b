//! Wire envelope shared by greetings and relayed chat messages.
//!
//! ```json
//! {"id":"SERVER-1700000000000","name":"SERVER","message":"Hello Client!"}
//! ```
//!
//! Values are encoded with serde_json, so quotes and control characters in a
//! relayed message are escaped and the frame always stays single-line JSON.

use serde::{Deserialize, Serialize};

use super::{connection::Connection, error::EnvelopeError};

/// Display name used for messages that originate from the relay itself.
pub const SERVER_NAME: &str = "SERVER";

/// Default greeting text.
pub const DEFAULT_GREETING: &str = "Hello Client!";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub id: String,
    pub name: String,
    pub message: String,
}

impl Envelope {
    /// Greeting sent once to each new connection.
    pub fn greeting(message: impl Into<String>, now_millis: i64) -> Self {
        Self {
            id: format!("{SERVER_NAME}-{now_millis}"),
            name: SERVER_NAME.to_string(),
            message: message.into(),
        }
    }

    /// Chat message relayed on behalf of `sender`.
    pub fn chat(sender: &Connection, message: impl Into<String>, now_millis: i64) -> Self {
        Self {
            id: format!("{}-{}", sender.id(), now_millis),
            name: sender.remote_addr().to_string(),
            message: message.into(),
        }
    }

    pub fn is_from_server(&self) -> bool {
        self.name == SERVER_NAME
    }

    pub fn encode(&self) -> Result<String, EnvelopeError> {
        serde_json::to_string(self).map_err(EnvelopeError::Encode)
    }

    pub fn decode(text: &str) -> Result<Self, EnvelopeError> {
        serde_json::from_str(text).map_err(EnvelopeError::Decode)
    }
}
