//! Error types for fieldguard
//!
//! Only configuration and transport problems are errors. Unknown constraint
//! keys are logged and absorbed, and field validation failures are returned
//! as [`crate::ValidationError`] data.

use thiserror::Error;

/// Core error type for fieldguard operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// The store was asked to fetch before `configure` was called
    #[error("The constraint service is not initialized. Call `configure` before loading constraints")]
    NotConfigured,

    /// Configuration values that cannot be used
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The constraints endpoint answered with a non-success status
    #[error("Fetching constraints from '{url}' failed with status {status}")]
    Transport {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// The request could not be sent or its body could not be read
    #[error("Constraints request failed: {0}")]
    Request(String),

    /// A constraints document or config file could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// The tracing subscriber could not be installed
    #[error("Telemetry error: {0}")]
    Telemetry(String),
}

impl Error {
    /// Whether the error came from the network round trip
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Request(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Result type alias for fieldguard operations
pub type Result<T> = std::result::Result<T, Error>;
