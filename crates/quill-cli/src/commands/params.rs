// Show the generation parameters for an accuracy value

use quill_completion::{map_accuracy_to_parameters, params::clamp_accuracy};
use tracing::warn;

use super::Command;
use crate::error::{CliError, CliResult};

/// Print mapped generation parameters as JSON
pub struct ParamsCommand {
    accuracy: f64,
}

impl ParamsCommand {
    pub fn new(accuracy: f64) -> Self {
        Self { accuracy }
    }
}

#[async_trait::async_trait]
impl Command for ParamsCommand {
    async fn execute(&self) -> CliResult<()> {
        if clamp_accuracy(self.accuracy) != self.accuracy {
            warn!("Accuracy {} is outside 0-100 and will be clamped", self.accuracy);
        }

        let params = map_accuracy_to_parameters(self.accuracy);
        let json = serde_json::to_string_pretty(&params)
            .map_err(|e| CliError::Internal(format!("Failed to serialize parameters: {}", e)))?;
        println!("{}", json);
        Ok(())
    }
}
