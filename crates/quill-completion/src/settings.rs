//! Live connector settings and the channel that updates them
//!
//! The settings UI owns a [`SettingsPublisher`] and pushes a
//! [`SettingsUpdate`] whenever the user submits the parameter form. Each
//! connector holds a [`SettingsSubscription`] and reads the latest value at
//! the start of every completion cycle, so an update applies to the next
//! cycle and never to one already in flight.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::trigger::FrequencyMode;

pub const DEFAULT_ACCURACY: f64 = 80.0;
pub const DEFAULT_MODEL: &str = "gpt";

/// Settings a connector reads on every cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorSettings {
    /// 0-100 slider value; sent as `temperature` under the temperature contract
    #[serde(alias = "temperature")]
    pub accuracy: f64,
    pub frequency: FrequencyMode,
    /// Model name; sent as `metadata` under the accuracy contract
    #[serde(alias = "metadata")]
    pub model: String,
}

impl Default for ConnectorSettings {
    fn default() -> Self {
        Self {
            accuracy: DEFAULT_ACCURACY,
            frequency: FrequencyMode::default(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

/// Payload of a configuration-submit event
pub type SettingsUpdate = ConnectorSettings;

/// Create a settings channel seeded with `initial`
pub fn settings_channel(initial: ConnectorSettings) -> (SettingsPublisher, SettingsSubscription) {
    let (sender, receiver) = watch::channel(initial);
    (
        SettingsPublisher { sender },
        SettingsSubscription { receiver },
    )
}

/// Writing end, held by whoever handles the settings form
#[derive(Debug)]
pub struct SettingsPublisher {
    sender: watch::Sender<ConnectorSettings>,
}

impl SettingsPublisher {
    /// Replace the live settings
    pub fn submit(&self, update: SettingsUpdate) {
        info!(
            accuracy = update.accuracy,
            frequency = %update.frequency,
            model = %update.model,
            "Applying connector settings"
        );
        // send_replace stores the value even with no receivers left
        self.sender.send_replace(update);
        if self.sender.receiver_count() == 0 {
            debug!("Settings submitted with no active subscribers");
        }
    }

    /// Parse a submit event from its JSON payload and apply it
    pub fn submit_json(&self, payload: &str) -> crate::Result<()> {
        let update: SettingsUpdate = serde_json::from_str(payload)?;
        self.submit(update);
        Ok(())
    }

    pub fn current(&self) -> ConnectorSettings {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> SettingsSubscription {
        SettingsSubscription {
            receiver: self.sender.subscribe(),
        }
    }
}

/// Reading end, injected into a connector
#[derive(Debug, Clone)]
pub struct SettingsSubscription {
    receiver: watch::Receiver<ConnectorSettings>,
}

impl SettingsSubscription {
    /// A subscription that never changes, for hosts without a settings form
    pub fn fixed(settings: ConnectorSettings) -> Self {
        let (publisher, subscription) = settings_channel(settings);
        // Dropping the sender keeps the last value readable
        drop(publisher);
        subscription
    }

    /// Snapshot of the latest submitted settings
    pub fn current(&self) -> ConnectorSettings {
        self.receiver.borrow().clone()
    }

    /// Wait for the next submit; returns `false` once the publisher is gone
    ///
    /// ```
    /// # use quill_completion::{settings_channel, ConnectorSettings};
    /// # tokio_test::block_on(async {
    /// let (publisher, mut subscription) = settings_channel(ConnectorSettings::default());
    /// publisher.submit(ConnectorSettings { accuracy: 30.0, ..ConnectorSettings::default() });
    /// assert!(subscription.changed().await);
    /// assert_eq!(subscription.current().accuracy, 30.0);
    ///
    /// drop(publisher);
    /// assert!(!subscription.changed().await);
    /// # });
    /// ```
    pub async fn changed(&mut self) -> bool {
        self.receiver.changed().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ConnectorSettings::default();
        assert_eq!(settings.accuracy, 80.0);
        assert_eq!(settings.frequency, FrequencyMode::OnWordComplete);
        assert_eq!(settings.model, "gpt");
    }

    #[test]
    fn test_submit_is_visible_to_subscribers() {
        let (publisher, subscription) = settings_channel(ConnectorSettings::default());
        let other = publisher.subscribe();

        publisher.submit(ConnectorSettings {
            accuracy: 20.0,
            frequency: FrequencyMode::OnKeyPress,
            model: "llama".to_string(),
        });

        assert_eq!(subscription.current().accuracy, 20.0);
        assert_eq!(other.current().frequency, FrequencyMode::OnKeyPress);
        assert_eq!(publisher.current().model, "llama");
    }

    #[test]
    fn test_snapshot_is_detached() {
        let (publisher, subscription) = settings_channel(ConnectorSettings::default());
        let before = subscription.current();
        publisher.submit(ConnectorSettings {
            accuracy: 5.0,
            ..ConnectorSettings::default()
        });
        assert_eq!(before.accuracy, 80.0);
        assert_eq!(subscription.current().accuracy, 5.0);
    }

    #[test]
    fn test_submit_json_aliases() {
        let (publisher, subscription) = settings_channel(ConnectorSettings::default());

        publisher
            .submit_json(r#"{"temperature": 42, "frequency": "onSentenceComplete", "metadata": "mistral"}"#)
            .unwrap();
        let current = subscription.current();
        assert_eq!(current.accuracy, 42.0);
        assert_eq!(current.frequency, FrequencyMode::OnSentenceComplete);
        assert_eq!(current.model, "mistral");

        publisher
            .submit_json(r#"{"accuracy": 10, "frequency": "bogus", "model": "gpt"}"#)
            .unwrap();
        assert_eq!(subscription.current().frequency, FrequencyMode::Disabled);
    }

    #[test]
    fn test_submit_without_subscribers() {
        let (publisher, subscription) = settings_channel(ConnectorSettings::default());
        drop(subscription);
        publisher.submit(ConnectorSettings {
            accuracy: 1.0,
            ..ConnectorSettings::default()
        });
        assert_eq!(publisher.current().accuracy, 1.0);
    }

    #[test]
    fn test_fixed_subscription() {
        let subscription = SettingsSubscription::fixed(ConnectorSettings {
            model: "fixed".to_string(),
            ..ConnectorSettings::default()
        });
        assert_eq!(subscription.current().model, "fixed");
    }

    #[tokio::test]
    async fn test_changed_notifies() {
        let (publisher, mut subscription) = settings_channel(ConnectorSettings::default());
        let waiter = tokio::spawn(async move {
            let changed = subscription.changed().await;
            (changed, subscription.current().accuracy)
        });

        publisher.submit(ConnectorSettings {
            accuracy: 55.0,
            ..ConnectorSettings::default()
        });

        let (changed, accuracy) = waiter.await.unwrap();
        assert!(changed);
        assert_eq!(accuracy, 55.0);
    }
}
