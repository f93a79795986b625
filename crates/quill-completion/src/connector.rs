//! Completion connector
//!
//! Runs one completion cycle per call: flatten the snapshot, consult the
//! trigger policy with the latest settings, and only then issue a single
//! cancellable POST to the backend. Skipped cycles do no I/O at all.
//!
//! The connector never retries and never spawns tasks; retry, backoff and
//! "one active request per document" are left to the caller (see
//! [`crate::scheduler::CompletionScheduler`] for a ready-made policy).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::backend::{parse_completion, PayloadContract};
use crate::config::CompletionConfig;
use crate::document::DocumentNode;
use crate::error::CompletionError;
use crate::flatten::flatten;
use crate::settings::{ConnectorSettings, SettingsSubscription};
use crate::trigger::should_trigger;
use crate::Result;

/// Default timeout for completion requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default pool idle timeout (90 seconds)
const DEFAULT_POOL_IDLE_TIMEOUT_SECS: u64 = 90;

/// Default TCP keep-alive interval (60 seconds)
const DEFAULT_TCP_KEEPALIVE_SECS: u64 = 60;

/// Something that can turn a document snapshot into a completion
#[async_trait]
pub trait CompletionFetcher: Send + Sync {
    /// Run one completion cycle
    ///
    /// Resolves to `Ok(None)` when the trigger policy declines. Once a
    /// request is issued, cancellation of `cancel` aborts it and the call
    /// fails with [`CompletionError::Cancelled`]; it never resolves with a
    /// completion after the token fired.
    async fn fetch_completion(
        &self,
        snapshot: &DocumentNode,
        cancel: &CancellationToken,
    ) -> Result<Option<String>>;
}

/// HTTP-backed completion connector
#[derive(Debug)]
pub struct CompletionConnector {
    client: Arc<Client>,
    endpoint: String,
    contract: PayloadContract,
    timeout: Duration,
    settings: SettingsSubscription,
}

impl CompletionConnector {
    /// Create a connector with the default timeout
    pub fn new(
        endpoint: String,
        contract: PayloadContract,
        settings: SettingsSubscription,
    ) -> Result<Self> {
        Self::with_timeout(
            endpoint,
            contract,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            settings,
        )
    }

    /// Create a connector with a custom request timeout
    ///
    /// # Errors
    /// Returns `Config` if the endpoint is empty or not an http(s) URL
    pub fn with_timeout(
        endpoint: String,
        contract: PayloadContract,
        timeout: Duration,
        settings: SettingsSubscription,
    ) -> Result<Self> {
        validate_endpoint(&endpoint)?;

        let client = Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT_SECS))
            .tcp_keepalive(Duration::from_secs(DEFAULT_TCP_KEEPALIVE_SECS))
            .build()
            .map_err(|e| CompletionError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client: Arc::new(client),
            endpoint,
            contract,
            timeout,
            settings,
        })
    }

    /// Create a connector from a loaded deployment config
    pub fn from_config(config: &CompletionConfig, settings: SettingsSubscription) -> Result<Self> {
        Self::with_timeout(
            config.endpoint.clone(),
            config.contract,
            config.timeout(),
            settings,
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn contract(&self) -> PayloadContract {
        self.contract
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Settings the next cycle will use
    pub fn current_settings(&self) -> ConnectorSettings {
        self.settings.current()
    }

    async fn post(&self, body: &Value) -> Result<String> {
        let response = self.client.post(&self.endpoint).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            error!("Completion backend returned HTTP {}", status);
            return Err(CompletionError::Backend {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_completion(&body).map_err(|e| {
            warn!("Malformed completion response: {}", e);
            e
        })
    }
}

#[async_trait]
impl CompletionFetcher for CompletionConnector {
    async fn fetch_completion(
        &self,
        snapshot: &DocumentNode,
        cancel: &CancellationToken,
    ) -> Result<Option<String>> {
        let text = flatten(snapshot);
        let settings = self.settings.current();

        if !should_trigger(&text, settings.frequency) {
            return Ok(None);
        }

        let body = self.contract.build_body(&text, &settings)?;

        if cancel.is_cancelled() {
            debug!("Completion cycle cancelled before request");
            return Err(CompletionError::Cancelled);
        }

        debug!(
            endpoint = %self.endpoint,
            contract = %self.contract,
            chars = text.len(),
            "Requesting completion"
        );

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Completion request cancelled in flight");
                Err(CompletionError::Cancelled)
            }
            result = self.post(&body) => result.map(Some),
        }
    }
}

fn validate_endpoint(endpoint: &str) -> Result<()> {
    if endpoint.is_empty() {
        return Err(CompletionError::Config(
            "Completion endpoint is required".to_string(),
        ));
    }

    let url = Url::parse(endpoint)
        .map_err(|e| CompletionError::Config(format!("Invalid endpoint '{}': {}", endpoint, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(CompletionError::Config(format!(
            "Unsupported endpoint scheme '{}'",
            other
        ))),
    }
}
