//! Server configuration.

use thiserror::Error;

use crate::domain::envelope::DEFAULT_GREETING;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 1323;
pub const DEFAULT_PATH: &str = "/ws";
pub const DEFAULT_MAX_RECEIVE_ERRORS: u32 = 16;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("endpoint path must start with '/', got '{0}'")]
    InvalidPath(String),

    #[error("endpoint path '{0}' collides with the health endpoint")]
    ReservedPath(String),

    #[error("host must not be empty")]
    EmptyHost,
}

/// Relay server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to bind to; 0 picks an ephemeral port
    pub port: u16,
    /// Path of the WebSocket endpoint
    pub path: String,
    /// Text of the greeting sent to each new connection
    pub greeting: String,
    /// Consecutive receive errors tolerated before a connection is closed (0 = unlimited)
    pub max_receive_errors: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            path: DEFAULT_PATH.to_string(),
            greeting: DEFAULT_GREETING.to_string(),
            max_receive_errors: DEFAULT_MAX_RECEIVE_ERRORS,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if !self.path.starts_with('/') {
            return Err(ConfigError::InvalidPath(self.path.clone()));
        }
        if self.path == crate::ui::HEALTH_PATH {
            return Err(ConfigError::ReservedPath(self.path.clone()));
        }
        Ok(())
    }
}
