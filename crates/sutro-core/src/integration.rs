// ── Lifecycle registry ──
//
// Host-side bookkeeping: one coordinator per configured entry, inserted on
// start and removed on stop. The core never stops an entry on its own.

use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use sutro_api::SutroClient;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::ConfigEntry;
use crate::coordinator::Coordinator;
use crate::error::CoreError;

struct Instance {
    entry: ConfigEntry,
    coordinator: Coordinator,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Map from entry id to its running coordinator.
#[derive(Default)]
pub struct Integration {
    entries: DashMap<String, Instance>,
    announced: AtomicBool,
}

impl Integration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set up an entry.
    ///
    /// Runs the first refresh inline. If it fails the entry is not
    /// registered and [`CoreError::NotReady`] is returned; the caller is
    /// expected to try again later. On success polling starts and the
    /// coordinator is returned.
    pub async fn start(&self, entry: ConfigEntry) -> Result<Coordinator, CoreError> {
        if self.entries.contains_key(&entry.entry_id) {
            return Err(CoreError::AlreadyStarted {
                entry_id: entry.entry_id,
            });
        }

        if !self.announced.swap(true, Ordering::Relaxed) {
            info!(version = env!("CARGO_PKG_VERSION"), "sutro integration loaded");
        }

        let monitor = &entry.monitor;
        let client = SutroClient::new(
            monitor.endpoint.clone(),
            monitor.token.clone(),
            &monitor.transport(),
        )?;
        let coordinator = Coordinator::new(entry.entry_id.clone(), client, monitor.poll_interval);

        if let Err(e) = coordinator.refresh().await {
            warn!(entry = %entry.entry_id, error = %e, "initial refresh failed");
            return Err(CoreError::NotReady {
                entry_id: entry.entry_id,
            });
        }

        let cancel = CancellationToken::new();
        let task = coordinator.spawn_polling(cancel.clone());

        match self.entries.entry(entry.entry_id.clone()) {
            Entry::Occupied(_) => {
                // Lost a race with a concurrent start of the same entry.
                cancel.cancel();
                Err(CoreError::AlreadyStarted {
                    entry_id: entry.entry_id,
                })
            }
            Entry::Vacant(slot) => {
                info!(entry = %entry.entry_id, title = %entry.title, "entry started");
                slot.insert(Instance {
                    entry,
                    coordinator: coordinator.clone(),
                    cancel,
                    task,
                });
                Ok(coordinator)
            }
        }
    }

    /// Tear an entry down. Returns `false` if it was not running.
    pub async fn stop(&self, entry_id: &str) -> bool {
        let Some((_, instance)) = self.entries.remove(entry_id) else {
            debug!(entry = %entry_id, "stop requested for unknown entry");
            return false;
        };

        instance.cancel.cancel();
        if let Err(e) = instance.task.await {
            warn!(entry = %entry_id, error = %e, "polling task ended abnormally");
        }
        info!(entry = %entry_id, "entry stopped");
        true
    }

    /// Stop (if running) and start again with the given entry.
    pub async fn restart(&self, entry: ConfigEntry) -> Result<Coordinator, CoreError> {
        self.stop(&entry.entry_id).await;
        self.start(entry).await
    }

    /// Stop every running entry.
    pub async fn shutdown(&self) {
        for id in self.entry_ids() {
            self.stop(&id).await;
        }
    }

    pub fn get(&self, entry_id: &str) -> Option<Coordinator> {
        self.entries.get(entry_id).map(|i| i.coordinator.clone())
    }

    pub fn entry(&self, entry_id: &str) -> Option<ConfigEntry> {
        self.entries.get(entry_id).map(|i| i.entry.clone())
    }

    pub fn entry_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
