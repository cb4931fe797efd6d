// ── Polling coordinator ──
//
// Owns the single shared snapshot for one account. Refreshes it on a fixed
// period or on demand, replaces it wholesale on success, keeps the last good
// one on failure, and tells every subscriber how the refresh went.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use sutro_api::{Snapshot, SutroClient};

use crate::error::CoreError;

// ── State ────────────────────────────────────────────────────────

/// `Stale` means "data may be outdated", not "no data".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CoordinatorState {
    Stale,
    Fresh,
}

/// Published to subscribers after every refresh attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateStatus {
    pub state: CoordinatorState,
    pub last_success: Option<DateTime<Utc>>,
    pub last_attempt: Option<DateTime<Utc>>,
    pub consecutive_failures: u32,
}

impl Default for UpdateStatus {
    fn default() -> Self {
        Self {
            state: CoordinatorState::Stale,
            last_success: None,
            last_attempt: None,
            consecutive_failures: 0,
        }
    }
}

// ── Coordinator ──────────────────────────────────────────────────

/// Cheaply cloneable handle; all clones share one snapshot.
#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<CoordinatorInner>,
}

struct CoordinatorInner {
    name: String,
    client: SutroClient,
    update_interval: Duration,
    snapshot: ArcSwapOption<Snapshot>,
    status: watch::Sender<UpdateStatus>,
    refresh_lock: Mutex<()>,
}

impl Coordinator {
    /// Starts out stale with no snapshot. Nothing is fetched until
    /// [`refresh()`](Self::refresh) or [`spawn_polling()`](Self::spawn_polling).
    pub fn new(name: impl Into<String>, client: SutroClient, update_interval: Duration) -> Self {
        let (status, _) = watch::channel(UpdateStatus::default());
        Self {
            inner: Arc::new(CoordinatorInner {
                name: name.into(),
                client,
                update_interval,
                snapshot: ArcSwapOption::empty(),
                status,
                refresh_lock: Mutex::new(()),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn update_interval(&self) -> Duration {
        self.inner.update_interval
    }

    // ── Reads ────────────────────────────────────────────────────

    /// Current snapshot, or the last good one if the latest refresh failed.
    ///
    /// The returned `Arc` never changes underneath the caller; a later call
    /// may return a different one.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.inner.snapshot.load_full()
    }

    pub fn state(&self) -> CoordinatorState {
        self.inner.status.borrow().state
    }

    pub fn last_update_success(&self) -> bool {
        self.state() == CoordinatorState::Fresh
    }

    pub fn status(&self) -> UpdateStatus {
        self.inner.status.borrow().clone()
    }

    /// Subscribe to refresh outcomes. Every attempt notifies, success or not.
    pub fn subscribe(&self) -> watch::Receiver<UpdateStatus> {
        self.inner.status.subscribe()
    }

    // ── Refresh ──────────────────────────────────────────────────

    /// Fetch once and publish the outcome.
    ///
    /// At most one fetch is in flight per coordinator; a concurrent caller
    /// waits for the running one and then performs its own. There is no
    /// retry here: the next tick or an explicit call is the retry.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        let _guard = self.inner.refresh_lock.lock().await;

        let fetched = self.inner.client.fetch().await;
        let now = Utc::now();

        if let Some(snapshot) = fetched {
            self.inner.snapshot.store(Some(Arc::new(snapshot)));
            self.inner.status.send_modify(|s| {
                s.state = CoordinatorState::Fresh;
                s.last_success = Some(now);
                s.last_attempt = Some(now);
                s.consecutive_failures = 0;
            });
            debug!(name = %self.inner.name, "snapshot refreshed");
            Ok(())
        } else {
            self.inner.status.send_modify(|s| {
                s.state = CoordinatorState::Stale;
                s.last_attempt = Some(now);
                s.consecutive_failures = s.consecutive_failures.saturating_add(1);
            });
            warn!(
                name = %self.inner.name,
                failures = self.inner.status.borrow().consecutive_failures,
                "update failed, keeping last snapshot"
            );
            Err(CoreError::UpdateFailed {
                name: self.inner.name.clone(),
            })
        }
    }

    // ── Mutations ────────────────────────────────────────────────

    /// Mark a recommendation done, then force a refresh to observe it.
    pub async fn complete_recommendation(&self, id: &str) -> Result<(), CoreError> {
        let result = self.inner.client.complete_recommendation(id).await;
        self.after_mutation(id, result.is_some()).await
    }

    /// Clear a recommendation's completion, then force a refresh.
    pub async fn uncomplete_recommendation(&self, id: &str) -> Result<(), CoreError> {
        let result = self.inner.client.uncomplete_recommendation(id).await;
        self.after_mutation(id, result.is_some()).await
    }

    async fn after_mutation(&self, id: &str, applied: bool) -> Result<(), CoreError> {
        let refreshed = self.refresh().await;
        if !applied {
            return Err(CoreError::MutationFailed { id: id.to_owned() });
        }
        refreshed
    }

    // ── Background polling ───────────────────────────────────────

    /// Spawn the fixed-period refresh loop. The first tick fires one full
    /// period from now; setup is expected to have refreshed already.
    pub fn spawn_polling(&self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(polling_task(self.clone(), cancel))
    }
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("name", &self.inner.name)
            .field("update_interval", &self.inner.update_interval)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

async fn polling_task(coordinator: Coordinator, cancel: CancellationToken) {
    if coordinator.update_interval().is_zero() {
        cancel.cancelled().await;
        return;
    }

    let mut interval = tokio::time::interval(coordinator.update_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                // Failure is already published to subscribers.
                let _ = coordinator.refresh().await;
            }
        }
    }

    debug!(name = %coordinator.name(), "polling stopped");
}
