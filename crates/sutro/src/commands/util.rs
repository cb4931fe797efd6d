//! Shared helpers for command handlers.

use std::sync::Arc;

use sutro_core::{ConfigEntry, Coordinator, Integration, Snapshot};

use crate::error::CliError;

/// One started entry for the lifetime of a command.
pub struct Session {
    integration: Integration,
    entry_id: String,
    pub title: String,
    pub coordinator: Coordinator,
}

impl Session {
    /// Start the entry. The first refresh runs before this returns.
    pub async fn open(entry: ConfigEntry) -> Result<Self, CliError> {
        let integration = Integration::new();
        let entry_id = entry.entry_id.clone();
        let title = entry.title.clone();
        let coordinator = integration.start(entry).await?;
        Ok(Self {
            integration,
            entry_id,
            title,
            coordinator,
        })
    }

    /// Latest snapshot (or the last good one).
    pub fn snapshot(&self) -> Result<Arc<Snapshot>, CliError> {
        self.coordinator
            .snapshot()
            .ok_or_else(|| CliError::Unavailable {
                name: self.entry_id.clone(),
            })
    }

    pub async fn close(self) {
        self.integration.stop(&self.entry_id).await;
    }
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Local wall-clock rendering for RFC 3339 timestamps.
pub fn local_time(ts: Option<chrono::DateTime<chrono::Utc>>) -> String {
    ts.map_or_else(
        || "-".into(),
        |t| {
            t.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        },
    )
}
