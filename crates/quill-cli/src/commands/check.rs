// Evaluate the trigger policy for a document

use std::path::PathBuf;

use quill_completion::{flatten, should_trigger, FrequencyMode};

use super::{read_document, Command};
use crate::error::CliResult;
use crate::output::OutputStyle;

/// Report whether a document would fire a completion request
pub struct CheckCommand {
    document: PathBuf,
    modes: Vec<FrequencyMode>,
}

impl CheckCommand {
    /// Check against `mode`, or every mode when `None`
    pub fn new(document: PathBuf, mode: Option<FrequencyMode>) -> Self {
        let modes = match mode {
            Some(mode) => vec![mode],
            None => FrequencyMode::ALL.to_vec(),
        };
        Self { document, modes }
    }

    /// Trigger decision for each configured mode
    pub fn evaluate(&self, text: &str) -> Vec<(FrequencyMode, bool)> {
        self.modes
            .iter()
            .map(|mode| (*mode, should_trigger(text, *mode)))
            .collect()
    }
}

#[async_trait::async_trait]
impl Command for CheckCommand {
    async fn execute(&self) -> CliResult<()> {
        let doc = read_document(&self.document)?;
        let text = flatten(&doc);
        let style = OutputStyle::default();

        for (mode, fires) in self.evaluate(&text) {
            let verdict = if fires { "fires" } else { "skipped" };
            println!("{}", style.key_value(mode.as_str(), verdict));
        }
        Ok(())
    }
}
