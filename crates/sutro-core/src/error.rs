// ── Core error types ──
//
// User-facing errors from sutro-core. Transport faults never reach this
// level as-is: the API layer collapses them to `None`, and the coordinator
// turns that into a single `UpdateFailed` signal.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Lifecycle ────────────────────────────────────────────────────
    /// First refresh during setup failed; the host should retry later.
    #[error("Entry '{entry_id}' is not ready: initial refresh failed")]
    NotReady { entry_id: String },

    #[error("Entry '{entry_id}' is already running")]
    AlreadyStarted { entry_id: String },

    // ── Polling ──────────────────────────────────────────────────────
    /// A scheduled or forced refresh produced no snapshot.
    #[error("Update failed for '{name}'")]
    UpdateFailed { name: String },

    // ── Account ──────────────────────────────────────────────────────
    #[error("Login failed, check credentials")]
    AuthenticationFailed,

    #[error("Failed to update recommendation {id}")]
    MutationFailed { id: String },

    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// `true` when a later attempt may succeed without user action.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NotReady { .. } | Self::UpdateFailed { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<sutro_api::Error> for CoreError {
    fn from(err: sutro_api::Error) -> Self {
        match err {
            sutro_api::Error::Tls(message) => CoreError::Config { message },
            other => CoreError::Internal(other.to_string()),
        }
    }
}
