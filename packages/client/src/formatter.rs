//! Message formatting utilities for client display.

use murmur_server::domain::Envelope;
use murmur_shared::time::timestamp_to_local_clock;

/// Name shown for lines the user sent themselves
pub const SELF_NAME: &str = "ME";

const UNKNOWN_TIME: &str = "--:--:--";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format an envelope received from the relay
    ///
    /// # Arguments
    ///
    /// * `envelope` - The decoded envelope
    /// * `received_at` - Unix timestamp when it arrived (milliseconds)
    pub fn format_envelope(envelope: &Envelope, received_at: i64) -> String {
        format!(
            "\n[{}] {} ({})\n",
            envelope.name,
            envelope.message,
            Self::clock(received_at)
        )
    }

    /// Format the local echo of a line the user sent
    pub fn format_sent(message: &str, sent_at: i64) -> String {
        format!("[{}] {} ({})\n", SELF_NAME, message, Self::clock(sent_at))
    }

    /// Format a text frame that is not a valid envelope
    pub fn format_raw_message(text: &str) -> String {
        format!("\n[raw] {}\n", text)
    }

    /// Format a binary frame
    pub fn format_binary_message(len: usize) -> String {
        format!("\n[binary] {} bytes\n", len)
    }

    fn clock(timestamp_millis: i64) -> String {
        timestamp_to_local_clock(timestamp_millis).unwrap_or_else(|| UNKNOWN_TIME.to_string())
    }
}
