// Command handlers for the quill CLI

pub mod check;
pub mod complete;
pub mod flatten;
pub mod params;
pub mod watch;

pub use check::CheckCommand;
pub use complete::{CompleteCommand, SettingsOverrides};
pub use flatten::FlattenCommand;
pub use params::ParamsCommand;
pub use watch::{WatchCommand, DEFAULT_WATCH_INTERVAL_SECS};

use std::path::Path;

use quill_completion::{CompletionConfig, ConfigLoader, DocumentNode};

use crate::error::{CliError, CliResult};

/// Trait for command handlers
#[async_trait::async_trait]
pub trait Command: Send + Sync {
    /// Execute the command
    async fn execute(&self) -> CliResult<()>;
}

/// Read a JSON document snapshot from disk
pub fn read_document(path: &Path) -> CliResult<DocumentNode> {
    let content = std::fs::read_to_string(path)?;
    DocumentNode::from_json(&content)
        .map_err(|e| CliError::Document(format!("{}: {}", path.display(), e)))
}

/// Load the deployment config (defaults when no file is given) plus env overrides
pub fn load_config(path: Option<&Path>) -> CliResult<CompletionConfig> {
    let config = match path {
        Some(path) => ConfigLoader::load(path)
            .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))?,
        None => CompletionConfig::default(),
    };
    ConfigLoader::apply_env_overrides(config).map_err(|e| CliError::Config(e.to_string()))
}
