// Follow a document on disk and run completion cycles as it changes

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use quill_completion::{
    flatten, settings_channel, CompletionConnector, CompletionScheduler, SettingsPublisher,
    SettingsSubscription,
};
use tracing::{debug, info, warn};

use super::{load_config, read_document, Command, SettingsOverrides};
use crate::error::CliResult;
use crate::output::OutputStyle;

/// Default period between document reads
pub const DEFAULT_WATCH_INTERVAL_SECS: u64 = 5;

/// Poll a document, log its flattened text and schedule completions
pub struct WatchCommand {
    document: PathBuf,
    config: Option<PathBuf>,
    overrides: SettingsOverrides,
    interval: Duration,
    settings_file: Option<PathBuf>,
}

impl WatchCommand {
    pub fn new(document: PathBuf, config: Option<PathBuf>, overrides: SettingsOverrides) -> Self {
        Self {
            document,
            config,
            overrides,
            interval: Duration::from_secs(DEFAULT_WATCH_INTERVAL_SECS),
            settings_file: None,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Re-read a JSON settings file on every tick and submit it when it changes
    pub fn with_settings_file(mut self, path: Option<PathBuf>) -> Self {
        self.settings_file = path;
        self
    }
}

/// Submits the contents of a settings file whenever they change
pub struct SettingsFileWatcher {
    path: PathBuf,
    last: Option<String>,
}

impl SettingsFileWatcher {
    pub fn new(path: PathBuf) -> Self {
        Self { path, last: None }
    }

    /// Returns `true` if new settings were submitted
    pub fn poll(&mut self, publisher: &SettingsPublisher) -> bool {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %self.path.display(), "Failed to read settings file: {}", e);
                return false;
            }
        };

        if self.last.as_deref() == Some(content.as_str()) {
            return false;
        }

        let applied = match publisher.submit_json(&content) {
            Ok(()) => true,
            Err(e) => {
                warn!(path = %self.path.display(), "Ignoring invalid settings: {}", e);
                false
            }
        };
        // Remember invalid content too so it is reported once
        self.last = Some(content);
        applied
    }
}

/// Log every settings submit until the publisher goes away
///
/// Returns the number of changes seen.
pub async fn log_settings_changes(mut subscription: SettingsSubscription) -> usize {
    let mut seen = 0;
    while subscription.changed().await {
        seen += 1;
        let settings = subscription.current();
        info!(
            accuracy = settings.accuracy,
            frequency = %settings.frequency,
            model = %settings.model,
            "Connector settings changed"
        );
    }
    debug!("Settings channel closed");
    seen
}

/// Read and flatten the document; `None` if it could not be read this tick
fn snapshot(path: &Path) -> Option<(quill_completion::DocumentNode, String)> {
    match read_document(path) {
        Ok(doc) => {
            let text = flatten(&doc);
            Some((doc, text))
        }
        Err(e) => {
            warn!("Skipping tick: {}", e);
            None
        }
    }
}

#[async_trait::async_trait]
impl Command for WatchCommand {
    async fn execute(&self) -> CliResult<()> {
        let config = self.overrides.apply(load_config(self.config.as_deref())?)?;
        let (publisher, subscription) = settings_channel(config.init_data.clone());
        let connector = CompletionConnector::from_config(&config, subscription)?;
        let scheduler = Arc::new(CompletionScheduler::new(connector, config.debounce()));
        let mut settings_watcher = self.settings_file.clone().map(SettingsFileWatcher::new);
        let settings_log = tokio::spawn(log_settings_changes(publisher.subscribe()));

        info!(
            document = %self.document.display(),
            endpoint = %config.endpoint,
            interval_ms = self.interval.as_millis() as u64,
            "Watching document"
        );

        let mut ticker = tokio::time::interval(self.interval);
        let mut last_text: Option<String> = None;
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = &mut ctrl_c => {
                    info!("Stopping watch");
                    scheduler.cancel_pending();
                    settings_log.abort();
                    return Ok(());
                }
                _ = ticker.tick() => {}
            }

            if let Some(watcher) = settings_watcher.as_mut() {
                watcher.poll(&publisher);
            }

            let Some((doc, text)) = snapshot(&self.document) else {
                continue;
            };
            info!(text = %text, "Flattened document");

            if last_text.as_deref() == Some(text.as_str()) {
                continue;
            }
            last_text = Some(text);

            let scheduler = Arc::clone(&scheduler);
            tokio::spawn(async move {
                match scheduler.request(&doc).await {
                    Ok(Some(completion)) => {
                        println!("{}", OutputStyle::default().suggestion(&completion));
                    }
                    Ok(None) => debug!("Trigger policy skipped this snapshot"),
                    Err(e) if e.is_cancelled() => debug!("Completion superseded"),
                    Err(e) => warn!("Completion failed: {}", e),
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_completion::{ConnectorSettings, FrequencyMode};

    #[test]
    fn test_settings_file_applied_once_per_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let (publisher, _subscription) = settings_channel(ConnectorSettings::default());
        let mut watcher = SettingsFileWatcher::new(path.clone());

        std::fs::write(&path, r#"{"accuracy": 20, "frequency": "onKeyPress", "model": "llama"}"#)
            .unwrap();
        assert!(watcher.poll(&publisher));
        assert!(!watcher.poll(&publisher));
        assert_eq!(publisher.current().frequency, FrequencyMode::OnKeyPress);

        std::fs::write(&path, r#"{"accuracy": 90, "frequency": "disabled", "model": "gpt"}"#)
            .unwrap();
        assert!(watcher.poll(&publisher));
        assert_eq!(publisher.current().accuracy, 90.0);
    }

    #[test]
    fn test_invalid_settings_keep_previous() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let (publisher, _subscription) = settings_channel(ConnectorSettings::default());
        let mut watcher = SettingsFileWatcher::new(path.clone());

        std::fs::write(&path, "{ not json").unwrap();
        assert!(!watcher.poll(&publisher));
        assert_eq!(publisher.current(), ConnectorSettings::default());
    }

    #[tokio::test]
    async fn test_settings_changes_logged_until_publisher_dropped() {
        let (publisher, _subscription) = settings_channel(ConnectorSettings::default());
        let logger = tokio::spawn(log_settings_changes(publisher.subscribe()));

        publisher.submit(ConnectorSettings {
            accuracy: 15.0,
            ..ConnectorSettings::default()
        });
        drop(publisher);

        assert_eq!(logger.await.unwrap(), 1);
    }

    #[test]
    fn test_missing_settings_file() {
        let (publisher, _subscription) = settings_channel(ConnectorSettings::default());
        let mut watcher = SettingsFileWatcher::new(PathBuf::from("/nonexistent/settings.json"));
        assert!(!watcher.poll(&publisher));
    }

    #[test]
    fn test_snapshot_flattens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(
            &path,
            r#"{"type": "root", "children": [{"type": "element", "name": "paragraph", "children": [{"type": "text", "data": "Hi "}, {"type": "element", "name": "ghostText"}]}]}"#,
        )
        .unwrap();

        let (_, text) = snapshot(&path).unwrap();
        assert_eq!(text, "Hi [[cursor]]\r\n\r\n");
    }
}
