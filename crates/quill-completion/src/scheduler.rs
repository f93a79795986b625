//! Debounce and supersede policy on top of a [`CompletionFetcher`]
//!
//! Editors fire an event per keystroke. The scheduler coalesces bursts into
//! one cycle after a quiet window and keeps at most one cycle active: every
//! new request cancels the previous one, whether it is still waiting out the
//! debounce window or already talking to the backend.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::connector::CompletionFetcher;
use crate::document::DocumentNode;
use crate::error::CompletionError;
use crate::Result;

pub struct CompletionScheduler<F> {
    fetcher: F,
    debounce: Duration,
    next_id: AtomicU64,
    active: Mutex<Option<(u64, CancellationToken)>>,
}

impl<F: CompletionFetcher> CompletionScheduler<F> {
    pub fn new(fetcher: F, debounce: Duration) -> Self {
        Self {
            fetcher,
            debounce,
            next_id: AtomicU64::new(0),
            active: Mutex::new(None),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Whether a cycle is currently waiting or in flight
    pub fn has_pending(&self) -> bool {
        self.active.lock().is_some()
    }

    /// Cancel the active cycle, if any
    pub fn cancel_pending(&self) {
        if let Some((id, token)) = self.active.lock().take() {
            debug!(request = id, "Cancelling pending completion");
            token.cancel();
        }
    }

    /// Schedule a completion cycle for `snapshot`, superseding any active one
    ///
    /// Fails with [`CompletionError::Cancelled`] if a newer request (or
    /// [`cancel_pending`](Self::cancel_pending)) supersedes this one before
    /// it resolves.
    pub async fn request(&self, snapshot: &DocumentNode) -> Result<Option<String>> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();

        if let Some((previous, previous_token)) = self.active.lock().replace((id, token.clone())) {
            debug!(request = previous, superseded_by = id, "Superseding completion request");
            previous_token.cancel();
        }

        // Clears the slot even if this future is dropped before finishing
        let _slot = ActiveSlot {
            active: &self.active,
            id,
        };
        self.run(snapshot, &token).await
    }

    async fn run(&self, snapshot: &DocumentNode, token: &CancellationToken) -> Result<Option<String>> {
        if !self.debounce.is_zero() {
            tokio::select! {
                biased;
                _ = token.cancelled() => return Err(CompletionError::Cancelled),
                _ = tokio::time::sleep(self.debounce) => {}
            }
        }
        self.fetcher.fetch_completion(snapshot, token).await
    }
}

/// Releases the active slot for request `id` unless a newer request owns it
struct ActiveSlot<'a> {
    active: &'a Mutex<Option<(u64, CancellationToken)>>,
    id: u64,
}

impl Drop for ActiveSlot<'_> {
    fn drop(&mut self) {
        let mut active = self.active.lock();
        if matches!(active.as_ref(), Some((current, _)) if *current == self.id) {
            *active = None;
        }
    }
}
