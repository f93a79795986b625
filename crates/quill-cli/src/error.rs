// CLI error types

use quill_completion::CompletionError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Document error: {0}")]
    Document(String),

    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CliError {
    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            CliError::InvalidArgument { message } => {
                format!("Invalid argument: {}\n\nRun 'quill --help' for usage information.", message)
            }
            CliError::Io(e) => format!("File operation failed: {}", e),
            CliError::Config(msg) => {
                format!("Configuration error: {}\n\nCheck the file passed with --config.", msg)
            }
            CliError::Document(msg) => {
                format!("Could not read document: {}\n\nDocuments are JSON node trees with a \"type\" tag.", msg)
            }
            CliError::Completion(CompletionError::Backend { status }) => {
                format!("The completion backend answered HTTP {}.", status)
            }
            CliError::Completion(e) if e.is_network() => {
                format!("Could not reach the completion backend: {}\n\nCheck the endpoint with --endpoint or QUILL_COMPLETION_ENDPOINT.", e)
            }
            CliError::Completion(e) => format!("Completion failed: {}", e),
            CliError::Internal(msg) => {
                format!("Internal error: {}\n\nPlease report this issue.", msg)
            }
        }
    }

    /// Get technical details for verbose mode
    pub fn technical_details(&self) -> String {
        format!("{:?}", self)
    }
}

pub type CliResult<T> = Result<T, CliError>;
