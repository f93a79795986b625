// Run one completion cycle against the configured backend

use std::path::PathBuf;

use quill_completion::{
    CompletionConfig, CompletionConnector, CompletionFetcher, ConnectorSettings, FrequencyMode,
    SettingsSubscription, Suggestion,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::{load_config, read_document, Command};
use crate::error::{CliError, CliResult};
use crate::output::{print_info, OutputStyle};

/// Command-line overrides layered on top of the config file
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub accuracy: Option<f64>,
    pub frequency: Option<FrequencyMode>,
    pub model: Option<String>,
    pub endpoint: Option<String>,
}

impl SettingsOverrides {
    /// Apply the overrides to a loaded config
    ///
    /// # Errors
    /// Returns `InvalidArgument` for a non-finite `--accuracy`
    pub fn apply(&self, mut config: CompletionConfig) -> CliResult<CompletionConfig> {
        if let Some(accuracy) = self.accuracy {
            if !accuracy.is_finite() {
                return Err(CliError::InvalidArgument {
                    message: format!("--accuracy must be a finite number, got {}", accuracy),
                });
            }
        }
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        config.init_data = self.apply_settings(config.init_data);
        Ok(config)
    }

    fn apply_settings(&self, mut settings: ConnectorSettings) -> ConnectorSettings {
        if let Some(accuracy) = self.accuracy {
            settings.accuracy = accuracy;
        }
        if let Some(frequency) = self.frequency {
            settings.frequency = frequency;
        }
        if let Some(model) = &self.model {
            settings.model = model.clone();
        }
        settings
    }
}

/// Request a completion for a document snapshot
pub struct CompleteCommand {
    document: PathBuf,
    config: Option<PathBuf>,
    overrides: SettingsOverrides,
    apply: bool,
}

impl CompleteCommand {
    pub fn new(document: PathBuf, config: Option<PathBuf>, overrides: SettingsOverrides) -> Self {
        Self {
            document,
            config,
            overrides,
            apply: false,
        }
    }

    /// Print the document with the completion inserted at the caret
    pub fn with_apply(mut self, apply: bool) -> Self {
        self.apply = apply;
        self
    }

    fn build_connector(&self) -> CliResult<CompletionConnector> {
        let config = self.overrides.apply(load_config(self.config.as_deref())?)?;
        debug!(endpoint = %config.endpoint, contract = %config.contract, "Building connector");

        let subscription = SettingsSubscription::fixed(config.init_data.clone());
        Ok(CompletionConnector::from_config(&config, subscription)?)
    }
}

#[async_trait::async_trait]
impl Command for CompleteCommand {
    async fn execute(&self) -> CliResult<()> {
        let doc = read_document(&self.document)?;
        let connector = self.build_connector()?;

        let cancel = CancellationToken::new();
        let interrupt = cancel.clone();
        let ctrl_c = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupted, cancelling completion request");
                interrupt.cancel();
            }
        });

        let result = connector.fetch_completion(&doc, &cancel).await;
        ctrl_c.abort();

        let completion = match result? {
            Some(completion) => completion,
            None => {
                print_info("Trigger policy skipped this document; no request was sent");
                return Ok(());
            }
        };

        if self.apply {
            let updated = Suggestion::new(completion).apply_to(&doc).ok_or_else(|| {
                CliError::Document("document has no caret placeholder".to_string())
            })?;
            let json = serde_json::to_string_pretty(&updated)
                .map_err(|e| CliError::Internal(format!("Failed to serialize document: {}", e)))?;
            println!("{}", json);
        } else {
            println!("{}", OutputStyle::default().suggestion(&completion));
        }
        Ok(())
    }
}
