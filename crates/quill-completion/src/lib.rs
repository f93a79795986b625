//! Quill Inline Completion
//!
//! Decides when a rich-text editor should ask a language-model backend for an
//! inline completion, and runs the resulting request.
//!
//! # Architecture
//!
//! A completion cycle is a short pipeline:
//!
//! 1. **Flattening**: the editor's document tree becomes plain text with a
//!    `[[cursor]]` marker where the caret is ([`flatten`])
//! 2. **Trigger policy**: the configured [`FrequencyMode`] decides whether the
//!    text justifies a request ([`should_trigger`])
//! 3. **Payload**: the request body is built for the deployment's
//!    [`PayloadContract`], optionally through the accuracy mapper
//!    ([`map_accuracy_to_parameters`])
//! 4. **Request**: one cancellable POST to the backend ([`CompletionConnector`])
//!
//! Steps 1-2 are synchronous and side-effect free, so they can run on every
//! keystroke. Only step 4 suspends.
//!
//! # Settings
//!
//! The settings form pushes updates through a [`SettingsPublisher`]; each
//! connector reads the latest [`ConnectorSettings`] at the start of a cycle
//! from the [`SettingsSubscription`] it was built with.
//!
//! # Request lifecycle
//!
//! Callers hand a `CancellationToken` to every cycle and cancel it when the
//! cycle is superseded. [`CompletionScheduler`] packages the usual policy:
//! debounce bursts of edits and keep one cycle active.
//!
//! # Example
//!
//! ```ignore
//! use quill_completion::*;
//! use tokio_util::sync::CancellationToken;
//!
//! let (publisher, subscription) = settings_channel(ConnectorSettings::default());
//! let connector = CompletionConnector::new(
//!     "http://localhost:3000/gpt/autocomplete".to_string(),
//!     PayloadContract::Accuracy,
//!     subscription,
//! )?;
//!
//! let doc = DocumentNode::root(vec![DocumentNode::element(
//!     "paragraph",
//!     vec![DocumentNode::text("Hello "), DocumentNode::cursor()],
//! )]);
//!
//! if let Some(completion) = connector.fetch_completion(&doc, &CancellationToken::new()).await? {
//!     println!("suggest: {}", completion);
//! }
//! ```

pub mod backend;
pub mod config;
pub mod connector;
pub mod document;
pub mod error;
pub mod flatten;
pub mod params;
pub mod scheduler;
pub mod settings;
pub mod suggestion;
pub mod trigger;

pub use backend::{parse_completion, PayloadContract};
pub use config::{CompletionConfig, ConfigFormat, ConfigLoader};
pub use connector::{CompletionConnector, CompletionFetcher};
pub use document::{DocumentNode, ElementNode, RootNode, TextNode, CURSOR_PLACEHOLDER};
pub use error::CompletionError;
pub use flatten::{cursor_count, flatten, CURSOR_MARKER, LINE_BREAK};
pub use params::{map_accuracy_to_parameters, GenerationParameters};
pub use scheduler::CompletionScheduler;
pub use settings::{
    settings_channel, ConnectorSettings, SettingsPublisher, SettingsSubscription, SettingsUpdate,
};
pub use suggestion::{AcceptMode, Suggestion, SuggestionState, SuggestionTracker};
pub use trigger::{should_trigger, FrequencyMode};

/// Result type for completion operations
pub type Result<T> = std::result::Result<T, CompletionError>;
