// Wire models for the Telldus Live JSON API.
//
// Fields use `#[serde(default)]` liberally because the API is inconsistent
// about field presence, and ids/scales/values arrive as numbers on some
// endpoint versions and strings on others — everything identity-like is
// normalized to strings at the edge.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Fallback display name for devices and sensors the server left unnamed.
pub const UNNAMED: &str = "NO NAME";

// ── String-or-number tolerance ───────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum Flexible {
    Text(String),
    Int(i64),
    Float(f64),
}

impl From<Flexible> for String {
    fn from(raw: Flexible) -> Self {
        match raw {
            Flexible::Text(s) => s,
            Flexible::Int(n) => n.to_string(),
            Flexible::Float(x) => x.to_string(),
        }
    }
}

fn de_flexible<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Flexible::deserialize(deserializer).map(String::from)
}

fn de_opt_flexible<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Flexible>::deserialize(deserializer).map(|v| v.map(String::from))
}

// ── Identity ────────────────────────────────────────────────────────

/// Server-assigned device identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceId(#[serde(deserialize_with = "de_flexible")] String);

/// Server-assigned sensor identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SensorId(#[serde(deserialize_with = "de_flexible")] String);

macro_rules! id_impls {
    ($name:ident) => {
        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

id_impls!(DeviceId);
id_impls!(SensorId);

// ── Device ──────────────────────────────────────────────────────────

/// Cached device record from `devices/list`.
///
/// `state` is a single method code (never a composite of bits);
/// `methods` is the bitmask of codes the device advertises support for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub id: DeviceId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub state: u32,
    #[serde(default, deserialize_with = "de_opt_flexible")]
    pub statevalue: Option<String>,
    #[serde(default)]
    pub methods: u32,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Sensor ──────────────────────────────────────────────────────────

/// One measurement entry in a sensor's `data` sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorDatum {
    #[serde(deserialize_with = "de_flexible")]
    pub name: String,
    #[serde(default, deserialize_with = "de_flexible")]
    pub scale: String,
    #[serde(default, deserialize_with = "de_flexible")]
    pub value: String,
}

/// Cached sensor record from `sensors/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorRecord {
    pub id: SensorId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub data: Vec<SensorDatum>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── User ────────────────────────────────────────────────────────────

/// Account details from `user/profile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── List envelopes ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct DeviceList {
    #[serde(default)]
    pub device: Vec<DeviceRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SensorList {
    #[serde(default)]
    pub sensor: Vec<SensorRecord>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;

    use super::*;

    #[test]
    fn device_ids_tolerate_numbers_and_strings() {
        let a: DeviceRecord = serde_json::from_value(json!({"id": 367, "name": "Hall"})).unwrap();
        let b: DeviceRecord = serde_json::from_value(json!({"id": "367", "name": "Hall"})).unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(a.id.as_str(), "367");
    }

    #[test]
    fn device_record_defaults_missing_fields() {
        let device: DeviceRecord = serde_json::from_value(json!({"id": "1"})).unwrap();
        assert_eq!(device.name, None);
        assert_eq!(device.state, 0);
        assert_eq!(device.statevalue, None);
        assert_eq!(device.methods, 0);
    }

    #[test]
    fn device_record_collects_undocumented_fields() {
        let device: DeviceRecord = serde_json::from_value(json!({
            "id": "1",
            "name": "Hall",
            "state": 2,
            "statevalue": "unknown",
            "methods": 915,
            "client": 42,
            "online": "1"
        }))
        .unwrap();
        assert_eq!(device.extra.get("client"), Some(&json!(42)));
        assert_eq!(device.extra.get("online"), Some(&json!("1")));
    }

    #[test]
    fn sensor_datum_tolerates_numeric_scale_and_value() {
        let datum: SensorDatum =
            serde_json::from_value(json!({"name": "temp", "scale": 0, "value": 21.5})).unwrap();
        assert_eq!(datum.scale, "0");
        assert_eq!(datum.value, "21.5");
    }

    #[test]
    fn list_envelopes_default_to_empty() {
        let devices: DeviceList = serde_json::from_value(json!({})).unwrap();
        assert!(devices.device.is_empty());

        let sensors: SensorList = serde_json::from_value(json!({"sensor": []})).unwrap();
        assert!(sensors.sensor.is_empty());
    }
}
