// Print the flattened form of a document

use std::path::PathBuf;

use quill_completion::{cursor_count, flatten};

use super::{read_document, Command};
use crate::error::CliResult;
use crate::output::OutputStyle;

/// Print a document as the backend would see it
pub struct FlattenCommand {
    document: PathBuf,
    raw: bool,
}

impl FlattenCommand {
    pub fn new(document: PathBuf) -> Self {
        Self {
            document,
            raw: false,
        }
    }

    /// Print the text exactly as produced, without escaping line breaks
    pub fn with_raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }
}

#[async_trait::async_trait]
impl Command for FlattenCommand {
    async fn execute(&self) -> CliResult<()> {
        let doc = read_document(&self.document)?;
        let text = flatten(&doc);

        if self.raw {
            print!("{}", text);
            return Ok(());
        }

        let style = OutputStyle::default();
        println!("{}", style.flattened(&text));
        println!("{}", style.key_value("caret markers", &cursor_count(&text).to_string()));
        Ok(())
    }
}
