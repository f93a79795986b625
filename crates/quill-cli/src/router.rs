// Command routing and dispatch

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use quill_completion::FrequencyMode;

use crate::commands::*;
use crate::error::CliResult;

/// Quill - inline completion trigger and request tool
#[derive(Parser, Debug)]
#[command(name = "quill")]
#[command(bin_name = "quill")]
#[command(about = "Inspect and run inline completion cycles for editor documents")]
#[command(
    long_about = "Quill decides when an editor should ask a language-model backend for an inline completion.\n\nDocuments are JSON node trees; an empty \"ghostText\" element marks the caret.\n\n  • quill flatten doc.json     Show the text sent to the backend\n  • quill check doc.json       Evaluate the trigger policy\n  • quill params 80            Show generation parameters for an accuracy\n  • quill complete doc.json    Request a completion\n  • quill watch doc.json       Follow a document and complete as it changes"
)]
#[command(version)]
#[command(author = "Quill Contributors")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimize output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Deployment config file (YAML or JSON)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print the flattened text of a document
    #[command(about = "Print a document as flattened text with the caret marker")]
    Flatten {
        /// Document snapshot (JSON)
        #[arg(value_name = "DOCUMENT")]
        document: PathBuf,

        /// Print the text unescaped
        #[arg(long)]
        raw: bool,
    },

    /// Evaluate the trigger policy
    #[command(about = "Report whether a document would trigger a completion request")]
    Check {
        /// Document snapshot (JSON)
        #[arg(value_name = "DOCUMENT")]
        document: PathBuf,

        /// Frequency mode to check (default: all modes)
        #[arg(short, long, value_parser = parse_frequency)]
        mode: Option<FrequencyMode>,
    },

    /// Show generation parameters for an accuracy value
    #[command(about = "Map an accuracy value (0-100) to generation parameters")]
    Params {
        /// Accuracy value
        #[arg(value_name = "ACCURACY", allow_negative_numbers = true)]
        accuracy: f64,
    },

    /// Request one completion
    #[command(about = "Run one completion cycle against the backend")]
    Complete {
        /// Document snapshot (JSON)
        #[arg(value_name = "DOCUMENT")]
        document: PathBuf,

        #[command(flatten)]
        settings: SettingsArgs,

        /// Print the document with the completion inserted
        #[arg(long)]
        apply: bool,
    },

    /// Follow a document on disk
    #[command(about = "Poll a document, log its flattened text and request completions")]
    Watch {
        /// Document snapshot (JSON)
        #[arg(value_name = "DOCUMENT")]
        document: PathBuf,

        #[command(flatten)]
        settings: SettingsArgs,

        /// Seconds between reads
        #[arg(long, default_value_t = DEFAULT_WATCH_INTERVAL_SECS)]
        interval: u64,

        /// JSON settings file re-applied whenever it changes
        #[arg(long, value_name = "FILE")]
        settings_file: Option<PathBuf>,
    },
}

/// Per-run overrides of the configured settings
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// Accuracy (0-100)
    #[arg(long)]
    pub accuracy: Option<f64>,

    /// Frequency mode (disabled, onKeyPress, onWordComplete, onSentenceComplete)
    #[arg(long, value_parser = parse_frequency)]
    pub frequency: Option<FrequencyMode>,

    /// Model name
    #[arg(long)]
    pub model: Option<String>,

    /// Backend endpoint URL
    #[arg(long)]
    pub endpoint: Option<String>,
}

impl From<SettingsArgs> for SettingsOverrides {
    fn from(args: SettingsArgs) -> Self {
        Self {
            accuracy: args.accuracy,
            frequency: args.frequency,
            model: args.model,
            endpoint: args.endpoint,
        }
    }
}

/// Strict mode parsing for the command line; unknown names are rejected
fn parse_frequency(value: &str) -> Result<FrequencyMode, String> {
    FrequencyMode::ALL
        .iter()
        .copied()
        .find(|mode| mode.as_str().eq_ignore_ascii_case(value))
        .ok_or_else(|| {
            let known: Vec<&str> = FrequencyMode::ALL.iter().map(|m| m.as_str()).collect();
            format!("unknown frequency '{}', expected one of: {}", value, known.join(", "))
        })
}

/// Command router
pub struct CommandRouter;

impl CommandRouter {
    /// Parse CLI arguments and route to appropriate handler
    pub async fn route() -> CliResult<()> {
        let cli = Cli::parse();

        crate::logging::init_logging(cli.verbose, cli.quiet, cli.log_level.as_deref());

        Self::execute(&cli).await
    }

    /// Execute a command
    pub async fn execute(cli: &Cli) -> CliResult<()> {
        match &cli.command {
            Commands::Flatten { document, raw } => {
                let cmd = FlattenCommand::new(document.clone()).with_raw(*raw);
                cmd.execute().await
            }
            Commands::Check { document, mode } => {
                let cmd = CheckCommand::new(document.clone(), *mode);
                cmd.execute().await
            }
            Commands::Params { accuracy } => {
                let cmd = ParamsCommand::new(*accuracy);
                cmd.execute().await
            }
            Commands::Complete {
                document,
                settings,
                apply,
            } => {
                let cmd =
                    CompleteCommand::new(document.clone(), cli.config.clone(), settings.clone().into())
                        .with_apply(*apply);
                cmd.execute().await
            }
            Commands::Watch {
                document,
                settings,
                interval,
                settings_file,
            } => {
                let cmd =
                    WatchCommand::new(document.clone(), cli.config.clone(), settings.clone().into())
                        .with_interval(Duration::from_secs((*interval).max(1)))
                        .with_settings_file(settings_file.clone());
                cmd.execute().await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_complete_with_overrides() {
        let cli = Cli::try_parse_from([
            "quill",
            "--config",
            "quill.yaml",
            "complete",
            "doc.json",
            "--accuracy",
            "25",
            "--frequency",
            "onSentenceComplete",
            "--apply",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("quill.yaml")));
        match cli.command {
            Commands::Complete { settings, apply, .. } => {
                assert_eq!(settings.accuracy, Some(25.0));
                assert_eq!(settings.frequency, Some(FrequencyMode::OnSentenceComplete));
                assert!(apply);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_frequency_rejected() {
        let result = Cli::try_parse_from(["quill", "check", "doc.json", "--mode", "always"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_frequency_case_insensitive() {
        assert_eq!(parse_frequency("onkeypress"), Ok(FrequencyMode::OnKeyPress));
    }

    #[test]
    fn test_watch_default_interval() {
        let cli = Cli::try_parse_from(["quill", "watch", "doc.json"]).unwrap();
        match cli.command {
            Commands::Watch { interval, settings_file, .. } => {
                assert_eq!(interval, DEFAULT_WATCH_INTERVAL_SECS);
                assert!(settings_file.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["quill", "params", "50", "--verbose"]).unwrap();
        assert!(cli.verbose);
    }
}
