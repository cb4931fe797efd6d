// sutro-core: Polling coordinator and entity model between sutro-api and consumers.

pub mod config;
pub mod coordinator;
pub mod entity;
pub mod error;
pub mod flow;
pub mod integration;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ConfigEntry, DEFAULT_POLL_INTERVAL, MonitorConfig};
pub use coordinator::{Coordinator, CoordinatorState, UpdateStatus};
pub use entity::{
    DeviceClass, EntityCategory, EntityKind, EntityState, SensorValue, TodoItem, TodoStatus,
};
pub use error::CoreError;
pub use flow::ConfigFlow;
pub use integration::Integration;

// Wire types consumers need without depending on sutro-api directly.
pub use sutro_api::{DEFAULT_ENDPOINT, LoginResult, Reading, Recommendation, Snapshot};
