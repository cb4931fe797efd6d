// Wire models for the data query.
//
// Field names mirror the GraphQL schema exactly (camelCase). Every scalar
// the server may omit is an `Option`: a missing chlorine or bromine reading
// means "no measurement", not zero. Numbers stay `serde_json::Number` so
// integral and fractional values are kept as sent; turning them into
// display values is the entity layer's job. A scalar of an unexpected type
// reads as absent instead of rejecting the whole snapshot.
//
// `Snapshot` keeps the document it was decoded from and serializes back to
// exactly that document. The typed tree is a read-only view over it.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

/// Decode a scalar, mapping a value of the wrong type to `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// `data` of the data query: the full account snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct Snapshot {
    pub me: Me,
    raw: Value,
}

impl Snapshot {
    /// The document as received from the server.
    pub fn as_value(&self) -> &Value {
        &self.raw
    }
}

impl TryFrom<Value> for Snapshot {
    type Error = serde_json::Error;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        #[derive(Deserialize)]
        struct View {
            me: Me,
        }

        let view = View::deserialize(&raw)?;
        Ok(Self { me: view.me, raw })
    }
}

impl From<Snapshot> for Value {
    fn from(snapshot: Snapshot) -> Self {
        snapshot.raw
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Me {
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub first_name: Option<String>,
    pub device: Device,
    #[serde(default)]
    pub hub: Option<Hub>,
    #[serde(default)]
    pub pool: Option<Pool>,
}

/// The floating monitor itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub serial_number: String,
    /// Percent, 0-100.
    #[serde(default, deserialize_with = "lenient")]
    pub battery_level: Option<Number>,
    /// Water temperature in °F.
    #[serde(default, deserialize_with = "lenient")]
    pub temperature: Option<Number>,
    #[serde(default, deserialize_with = "lenient")]
    pub online: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub current_firmware_version: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub lid_open: Option<bool>,
    /// `true` when the sensing core reports healthy.
    #[serde(default, deserialize_with = "lenient")]
    pub core_status: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub should_take_readings: Option<bool>,
    /// Remaining chlorine cartridge charges.
    #[serde(default, deserialize_with = "lenient")]
    pub chlorine_charges: Option<Number>,
    /// Remaining bromine cartridge charges.
    #[serde(default, deserialize_with = "lenient")]
    pub bromine_charges: Option<Number>,
    #[serde(default, deserialize_with = "lenient")]
    pub health: Option<String>,
}

/// Wi-Fi hub / charging dock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hub {
    #[serde(default, deserialize_with = "lenient")]
    pub online: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub charger_status: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub ssid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pool {
    #[serde(default, rename = "type", deserialize_with = "lenient")]
    pub pool_type: Option<String>,
    #[serde(default)]
    pub latest_reading: Option<Reading>,
    #[serde(default)]
    pub latest_recommendations: Option<LatestRecommendations>,
}

/// One water chemistry measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub ph: Option<Number>,
    /// Total alkalinity, ppm.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub alkalinity: Option<Number>,
    /// Free chlorine, ppm.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub chlorine: Option<Number>,
    /// Bromine, ppm.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub bromine: Option<Number>,
    /// Kept as the server's string.
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub reading_time: Option<String>,
}

impl Reading {
    pub fn ph(&self) -> Option<f64> {
        self.ph.as_ref().and_then(Number::as_f64)
    }

    pub fn alkalinity(&self) -> Option<f64> {
        self.alkalinity.as_ref().and_then(Number::as_f64)
    }

    pub fn chlorine(&self) -> Option<f64> {
        self.chlorine.as_ref().and_then(Number::as_f64)
    }

    pub fn bromine(&self) -> Option<f64> {
        self.bromine.as_ref().and_then(Number::as_f64)
    }

    pub fn reading_time(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.reading_time.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LatestRecommendations {
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

/// A server-issued pool care action. Completion state is owned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub treatment: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub explanation: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub decision: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub completed_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub expired_at: Option<String>,
}

impl Recommendation {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.completed_at.as_deref())
    }

    pub fn expired_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.expired_at.as_deref())
    }
}

// ── Snapshot accessors ───────────────────────────────────────────────

impl Snapshot {
    pub fn serial_number(&self) -> &str {
        &self.me.device.serial_number
    }

    pub fn device(&self) -> &Device {
        &self.me.device
    }

    pub fn hub(&self) -> Option<&Hub> {
        self.me.hub.as_ref()
    }

    pub fn pool(&self) -> Option<&Pool> {
        self.me.pool.as_ref()
    }

    pub fn latest_reading(&self) -> Option<&Reading> {
        self.pool().and_then(|p| p.latest_reading.as_ref())
    }

    /// Latest recommendations, empty when the pool has none.
    pub fn recommendations(&self) -> &[Recommendation] {
        self.pool()
            .and_then(|p| p.latest_recommendations.as_ref())
            .map(|r| r.recommendations.as_slice())
            .unwrap_or_default()
    }

    pub fn recommendation(&self, id: &str) -> Option<&Recommendation> {
        self.recommendations().iter().find(|r| r.id == id)
    }
}

fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}
