//! Wire format of the completion backend
//!
//! A deployment fixes one [`PayloadContract`]; the connector builds every
//! request body through it.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CompletionError;
use crate::params::{map_accuracy_to_parameters, GenerationParameters};
use crate::settings::ConnectorSettings;
use crate::Result;

/// Which request body shape the backend expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadContract {
    /// `{ text, accuracy, metadata }`
    #[default]
    Accuracy,
    /// `{ text, temperature }`
    Temperature,
    /// `{ text, model, options }` with mapped generation parameters
    Generation,
}

impl fmt::Display for PayloadContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PayloadContract::Accuracy => "accuracy",
            PayloadContract::Temperature => "temperature",
            PayloadContract::Generation => "generation",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Serialize)]
struct AccuracyRequest<'a> {
    text: &'a str,
    accuracy: f64,
    metadata: &'a str,
}

#[derive(Debug, Serialize)]
struct TemperatureRequest<'a> {
    text: &'a str,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    text: &'a str,
    model: &'a str,
    options: GenerationParameters,
}

impl PayloadContract {
    /// Build the JSON request body for `text` under the given settings
    pub fn build_body(&self, text: &str, settings: &ConnectorSettings) -> Result<Value> {
        let body = match self {
            PayloadContract::Accuracy => serde_json::to_value(AccuracyRequest {
                text,
                accuracy: settings.accuracy,
                metadata: &settings.model,
            })?,
            PayloadContract::Temperature => serde_json::to_value(TemperatureRequest {
                text,
                temperature: settings.accuracy,
            })?,
            PayloadContract::Generation => serde_json::to_value(GenerationRequest {
                text,
                model: &settings.model,
                options: map_accuracy_to_parameters(settings.accuracy),
            })?,
        };
        Ok(body)
    }
}

/// Extract the completion string from a success body
///
/// The body must be a JSON object carrying a non-empty string `completion`.
pub fn parse_completion(body: &str) -> Result<String> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| CompletionError::Protocol(format!("Response is not JSON: {}", e)))?;

    match value.get("completion") {
        Some(Value::String(completion)) if !completion.is_empty() => Ok(completion.clone()),
        Some(Value::String(_)) => Err(CompletionError::Protocol(
            "Invalid response: empty \"completion\" field".to_string(),
        )),
        Some(other) => Err(CompletionError::Protocol(format!(
            "Invalid response: \"completion\" is not a string ({})",
            other
        ))),
        None => Err(CompletionError::Protocol(
            "Invalid response: missing \"completion\" field".to_string(),
        )),
    }
}
