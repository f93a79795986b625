/// Deployment configuration for the completion connector
use crate::backend::PayloadContract;
use crate::connector::DEFAULT_TIMEOUT_SECS;
use crate::error::CompletionError;
use crate::settings::ConnectorSettings;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable that overrides the configured endpoint
pub const ENDPOINT_ENV_VAR: &str = "QUILL_COMPLETION_ENDPOINT";

pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/gpt/autocomplete";

/// Default quiescence window before a scheduled request fires
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Connector configuration as loaded from YAML or JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Backend URL receiving the POST
    pub endpoint: String,
    /// Request body shape the backend expects
    pub contract: PayloadContract,
    pub timeout_secs: u64,
    pub debounce_ms: u64,
    /// Settings in force until the first configuration submit
    pub init_data: ConnectorSettings,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            contract: PayloadContract::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            init_data: ConnectorSettings::default(),
        }
    }
}

impl CompletionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Guess the format from a file extension; YAML unless it says json
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Yaml,
        }
    }
}

/// Completion configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a file, picking the format by extension
    pub fn load(path: &Path) -> Result<CompletionConfig> {
        let content = std::fs::read_to_string(path)?;
        Self::load_from_string(&content, ConfigFormat::from_path(path))
    }

    /// Load completion configuration from a YAML file
    pub fn load_from_yaml(path: &Path) -> Result<CompletionConfig> {
        let content = std::fs::read_to_string(path)?;
        Self::load_from_string(&content, ConfigFormat::Yaml)
    }

    /// Load completion configuration from a JSON file
    pub fn load_from_json(path: &Path) -> Result<CompletionConfig> {
        let content = std::fs::read_to_string(path)?;
        Self::load_from_string(&content, ConfigFormat::Json)
    }

    /// Load completion configuration from a string
    pub fn load_from_string(content: &str, format: ConfigFormat) -> Result<CompletionConfig> {
        let config = match format {
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
        };
        Self::validate_config(&config)?;
        Ok(config)
    }

    /// Replace the endpoint with `QUILL_COMPLETION_ENDPOINT` when it is set
    pub fn apply_env_overrides(mut config: CompletionConfig) -> Result<CompletionConfig> {
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV_VAR) {
            if !endpoint.trim().is_empty() {
                config.endpoint = endpoint.trim().to_string();
            }
        }
        Self::validate_config(&config)?;
        Ok(config)
    }

    /// Validate completion configuration
    pub fn validate_config(config: &CompletionConfig) -> Result<()> {
        if config.endpoint.is_empty() {
            return Err(CompletionError::Config(
                "Endpoint cannot be empty".to_string(),
            ));
        }

        if !(config.endpoint.starts_with("http://") || config.endpoint.starts_with("https://")) {
            return Err(CompletionError::Config(format!(
                "Endpoint must be an http(s) URL: {}",
                config.endpoint
            )));
        }

        if config.timeout_secs == 0 {
            return Err(CompletionError::Config(
                "Timeout must be greater than zero".to_string(),
            ));
        }

        if !config.init_data.accuracy.is_finite() {
            return Err(CompletionError::Config(
                "Initial accuracy must be a finite number".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trigger::FrequencyMode;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_is_valid() {
        let config = CompletionConfig::default();
        assert!(ConfigLoader::validate_config(&config).is_ok());
        assert_eq!(config.contract, PayloadContract::Accuracy);
        assert_eq!(config.debounce(), Duration::from_millis(300));
    }

    #[test]
    fn test_load_yaml_string() {
        let yaml = r#"
endpoint: http://localhost:3000/llama/autocomplete
contract: temperature
timeout_secs: 10
init_data:
  temperature: 80
  frequency: onWordComplete
  model: llama
"#;
        let config = ConfigLoader::load_from_string(yaml, ConfigFormat::Yaml).unwrap();
        assert_eq!(config.contract, PayloadContract::Temperature);
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.debounce_ms, DEFAULT_DEBOUNCE_MS);
        assert_eq!(config.init_data.accuracy, 80.0);
        assert_eq!(config.init_data.model, "llama");
    }

    #[test]
    fn test_load_json_string_partial() {
        let json = r#"{"endpoint": "https://example.com/complete"}"#;
        let config = ConfigLoader::load_from_string(json, ConfigFormat::Json).unwrap();
        assert_eq!(config.endpoint, "https://example.com/complete");
        assert_eq!(config.init_data.frequency, FrequencyMode::OnWordComplete);
    }

    #[test]
    fn test_validation_failures() {
        let bad = [
            "endpoint: ''",
            "endpoint: localhost:3000",
            "timeout_secs: 0",
        ];
        for yaml in bad {
            let result = ConfigLoader::load_from_string(yaml, ConfigFormat::Yaml);
            assert!(matches!(result, Err(CompletionError::Config(_))), "accepted {}", yaml);
        }
    }

    #[test]
    fn test_load_from_file_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"contract": "generation", "debounce_ms": 150}}"#).unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.contract, PayloadContract::Generation);
        assert_eq!(config.debounce_ms, 150);
    }

    #[test]
    fn test_load_yaml_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "debounce_ms: 50").unwrap();

        let config = ConfigLoader::load_from_yaml(file.path()).unwrap();
        assert_eq!(config.debounce_ms, 50);
    }

    #[test]
    fn test_missing_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/quill.yaml"));
        assert!(matches!(result, Err(CompletionError::Io(_))));
    }
}
