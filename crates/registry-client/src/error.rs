//! Error types for the registry client

use thiserror::Error;

/// Registry client error type
#[derive(Error, Debug)]
pub enum Error {
    /// Request failed before an HTTP response came back
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Agent answered, but not with a clean success
    #[error("Agent returned status {status}: {body:?}")]
    Protocol {
        /// HTTP status code the agent returned
        status: u16,
        /// Response body, usually an error message from the agent
        body: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Status code the agent answered with, if it answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Protocol { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the request never reached the agent
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    /// Whether the agent answered outside the success contract
    pub fn is_protocol(&self) -> bool {
        matches!(self, Error::Protocol { .. })
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
