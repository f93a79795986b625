//! Error types for completion cycles and configuration loading

use thiserror::Error;

/// Errors that can occur while fetching a completion or loading configuration
///
/// Flattening and trigger evaluation never fail; a skipped cycle is `Ok(None)`,
/// not an error.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Transport-level failure (connection refused, reset, DNS, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// The request did not finish within the configured timeout
    #[error("Timeout: {0}")]
    Timeout(String),

    /// The cycle's cancellation token fired before the backend responded
    #[error("Completion request cancelled")]
    Cancelled,

    /// The backend answered with a non-success status
    #[error("Backend error: HTTP {status}")]
    Backend { status: u16 },

    /// The backend answered 2xx but the body is not a usable completion
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CompletionError {
    /// Whether this error belongs to the network class (transport, timeout, cancellation)
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            CompletionError::Network(_) | CompletionError::Timeout(_) | CompletionError::Cancelled
        )
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, CompletionError::Cancelled)
    }

    /// Status code carried by a backend error
    pub fn status(&self) -> Option<u16> {
        match self {
            CompletionError::Backend { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CompletionError::Timeout(err.to_string())
        } else if err.is_decode() {
            CompletionError::Protocol(err.to_string())
        } else {
            CompletionError::Network(err.to_string())
        }
    }
}
