// ── Entity descriptors ──
//
// Presentation is data, not a class hierarchy: each entity is a static
// descriptor (key, unit, category, extractor) and one generic renderer
// turns a snapshot into entity states. Every entity reads the same shared
// snapshot; none of them fetch.

use std::fmt;

use serde::Serialize;
use serde_json::Number;
use sutro_api::Snapshot;

use crate::coordinator::Coordinator;
use crate::error::CoreError;

// ── Shared vocabulary ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntityCategory {
    Primary,
    Diagnostic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
    Sensor,
    BinarySensor,
}

/// Binary sensor semantics. For `Problem`, `on` means something is wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeviceClass {
    Connectivity,
    Opening,
    Problem,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SensorValue {
    Number(f64),
    Integer(i64),
    Text(String),
    Bool(bool),
}

impl fmt::Display for SensorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n:.2}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Bool(true) => f.write_str("on"),
            Self::Bool(false) => f.write_str("off"),
        }
    }
}

// ── Descriptors ──────────────────────────────────────────────────

pub struct SensorDescription {
    pub key: &'static str,
    pub name: &'static str,
    pub unit: Option<&'static str>,
    pub category: EntityCategory,
    pub value: fn(&Snapshot) -> Option<SensorValue>,
}

pub struct BinarySensorDescription {
    pub key: &'static str,
    pub name: &'static str,
    pub device_class: DeviceClass,
    pub category: EntityCategory,
    pub is_on: fn(&Snapshot) -> Option<bool>,
}

fn number(v: Option<f64>) -> Option<SensorValue> {
    v.map(SensorValue::Number)
}

/// Whole counts render as integers; anything else falls back to a float.
fn count(v: Option<&Number>) -> Option<SensorValue> {
    let n = v?;
    n.as_i64()
        .map(SensorValue::Integer)
        .or_else(|| n.as_f64().map(SensorValue::Number))
}

fn text(v: Option<&String>) -> Option<SensorValue> {
    v.map(|s| SensorValue::Text(s.clone()))
}

pub const SENSORS: &[SensorDescription] = &[
    SensorDescription {
        key: "battery",
        name: "Battery Level",
        unit: Some("%"),
        category: EntityCategory::Diagnostic,
        value: |s: &Snapshot| count(s.device().battery_level.as_ref()),
    },
    SensorDescription {
        key: "temperature",
        name: "Water Temperature",
        unit: Some("°F"),
        category: EntityCategory::Primary,
        value: |s: &Snapshot| number(s.device().temperature.as_ref().and_then(Number::as_f64)),
    },
    SensorDescription {
        key: "ph",
        name: "pH",
        unit: Some("pH"),
        category: EntityCategory::Primary,
        value: |s: &Snapshot| number(s.latest_reading().and_then(|r| r.ph())),
    },
    SensorDescription {
        key: "alkalinity",
        name: "Alkalinity",
        unit: Some("ppm"),
        category: EntityCategory::Primary,
        value: |s: &Snapshot| number(s.latest_reading().and_then(|r| r.alkalinity())),
    },
    SensorDescription {
        key: "chlorine",
        name: "Free Chlorine",
        unit: Some("ppm"),
        category: EntityCategory::Primary,
        value: |s: &Snapshot| number(s.latest_reading().and_then(|r| r.chlorine())),
    },
    SensorDescription {
        key: "bromine",
        name: "Bromine",
        unit: Some("ppm"),
        category: EntityCategory::Primary,
        value: |s: &Snapshot| number(s.latest_reading().and_then(|r| r.bromine())),
    },
    SensorDescription {
        key: "reading-time",
        name: "Last Reading",
        unit: None,
        category: EntityCategory::Primary,
        value: |s: &Snapshot| {
            s.latest_reading()
                .and_then(|r| r.reading_time())
                .map(|t| SensorValue::Text(t.to_rfc3339()))
        },
    },
    SensorDescription {
        key: "chlorine-charges",
        name: "Chlorine Charges",
        unit: None,
        category: EntityCategory::Diagnostic,
        value: |s: &Snapshot| count(s.device().chlorine_charges.as_ref()),
    },
    SensorDescription {
        key: "bromine-charges",
        name: "Bromine Charges",
        unit: None,
        category: EntityCategory::Diagnostic,
        value: |s: &Snapshot| count(s.device().bromine_charges.as_ref()),
    },
    SensorDescription {
        key: "firmware",
        name: "Firmware Version",
        unit: None,
        category: EntityCategory::Diagnostic,
        value: |s: &Snapshot| text(s.device().current_firmware_version.as_ref()),
    },
    SensorDescription {
        key: "health",
        name: "Device Health",
        unit: None,
        category: EntityCategory::Diagnostic,
        value: |s: &Snapshot| text(s.device().health.as_ref()),
    },
    SensorDescription {
        key: "hub-charger",
        name: "Hub Charger Status",
        unit: None,
        category: EntityCategory::Diagnostic,
        value: |s: &Snapshot| text(s.hub().and_then(|h| h.charger_status.as_ref())),
    },
    SensorDescription {
        key: "hub-ssid",
        name: "Hub Wi-Fi Network",
        unit: None,
        category: EntityCategory::Diagnostic,
        value: |s: &Snapshot| text(s.hub().and_then(|h| h.ssid.as_ref())),
    },
];

pub const BINARY_SENSORS: &[BinarySensorDescription] = &[
    BinarySensorDescription {
        key: "device-online",
        name: "Device Online",
        device_class: DeviceClass::Connectivity,
        category: EntityCategory::Diagnostic,
        is_on: |s: &Snapshot| s.device().online,
    },
    BinarySensorDescription {
        key: "hub-online",
        name: "Hub Online",
        device_class: DeviceClass::Connectivity,
        category: EntityCategory::Diagnostic,
        is_on: |s: &Snapshot| s.hub().and_then(|h| h.online),
    },
    BinarySensorDescription {
        key: "lid-open",
        name: "Device Lid Open",
        device_class: DeviceClass::Opening,
        category: EntityCategory::Primary,
        is_on: |s: &Snapshot| s.device().lid_open,
    },
    BinarySensorDescription {
        key: "core-status",
        name: "Core Status",
        device_class: DeviceClass::Problem,
        category: EntityCategory::Diagnostic,
        is_on: |s: &Snapshot| s.device().core_status.map(|ok| !ok),
    },
    BinarySensorDescription {
        key: "not-taking-readings",
        name: "Taking Readings",
        device_class: DeviceClass::Problem,
        category: EntityCategory::Diagnostic,
        is_on: |s: &Snapshot| s.device().should_take_readings.map(|ok| !ok),
    },
];

// ── Renderer ─────────────────────────────────────────────────────

/// One entity's state as derived from a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityState {
    pub unique_id: String,
    pub kind: EntityKind,
    pub name: &'static str,
    /// `None` when the snapshot has no measurement for this entity.
    pub value: Option<SensorValue>,
    pub unit: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_class: Option<DeviceClass>,
    pub category: EntityCategory,
    /// Mirrors the coordinator's last-update flag.
    pub available: bool,
}

fn unique_id(snapshot: &Snapshot, key: &str) -> String {
    format!("{}-{key}", snapshot.serial_number())
}

pub fn render_sensors(snapshot: &Snapshot, available: bool) -> Vec<EntityState> {
    SENSORS
        .iter()
        .map(|d| EntityState {
            unique_id: unique_id(snapshot, d.key),
            kind: EntityKind::Sensor,
            name: d.name,
            value: (d.value)(snapshot),
            unit: d.unit,
            device_class: None,
            category: d.category,
            available,
        })
        .collect()
}

pub fn render_binary_sensors(snapshot: &Snapshot, available: bool) -> Vec<EntityState> {
    BINARY_SENSORS
        .iter()
        .map(|d| EntityState {
            unique_id: unique_id(snapshot, d.key),
            kind: EntityKind::BinarySensor,
            name: d.name,
            value: (d.is_on)(snapshot).map(SensorValue::Bool),
            unit: None,
            device_class: Some(d.device_class),
            category: d.category,
            available,
        })
        .collect()
}

/// Every sensor and binary sensor for the coordinator's current snapshot.
///
/// Empty until the first successful refresh.
pub fn render_all(coordinator: &Coordinator) -> Vec<EntityState> {
    let Some(snapshot) = coordinator.snapshot() else {
        return Vec::new();
    };
    let available = coordinator.last_update_success();
    let mut states = render_sensors(&snapshot, available);
    states.extend(render_binary_sensors(&snapshot, available));
    states
}

// ── Recommendations as to-do items ───────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TodoStatus {
    NeedsAction,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoItem {
    pub uid: String,
    pub summary: String,
    pub description: Option<String>,
    pub status: TodoStatus,
}

pub fn todo_items(snapshot: &Snapshot) -> Vec<TodoItem> {
    snapshot
        .recommendations()
        .iter()
        .map(|r| TodoItem {
            uid: r.id.clone(),
            summary: r.treatment.clone().unwrap_or_default(),
            description: r.explanation.clone(),
            status: if r.is_completed() {
                TodoStatus::Completed
            } else {
                TodoStatus::NeedsAction
            },
        })
        .collect()
}

/// Move a to-do item to `status` on the server, then refresh.
pub async fn update_todo_item(
    coordinator: &Coordinator,
    uid: &str,
    status: TodoStatus,
) -> Result<(), CoreError> {
    match status {
        TodoStatus::Completed => coordinator.complete_recommendation(uid).await,
        TodoStatus::NeedsAction => coordinator.uncomplete_recommendation(uid).await,
    }
}
