use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Outcome of a reference-table lookup for a single record field.
///
/// On the wire a resolved name serializes as the plain string, an
/// unresolved lookup as `false`, and a field that had no input data at
/// all as `"N/A"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(String),
    Unresolved,
    NotApplicable,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Resolved(name) => f.write_str(name),
            Resolution::Unresolved => f.write_str("—"),
            Resolution::NotApplicable => f.write_str("N/A"),
        }
    }
}

impl Serialize for Resolution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Resolution::Resolved(name) => serializer.serialize_str(name),
            Resolution::Unresolved => serializer.serialize_bool(false),
            Resolution::NotApplicable => serializer.serialize_str("N/A"),
        }
    }
}

impl<'de> Deserialize<'de> for Resolution {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Flag(bool),
            Text(String),
        }
        Ok(match Wire::deserialize(deserializer)? {
            Wire::Text(text) if text == "N/A" => Resolution::NotApplicable,
            Wire::Text(text) => Resolution::Resolved(text),
            Wire::Flag(_) => Resolution::Unresolved,
        })
    }
}

/// One raw advertisement as reported by the scan primitive.
///
/// Manufacturer-data entries are keyed by the 16-bit company ID; a
/// `BTreeMap` keeps multi-entry payloads in a deterministic order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawAdvertisement {
    pub address: String,
    pub rssi: Option<i16>,
    pub local_name: Option<String>,
    pub manufacturer_data: BTreeMap<u16, Vec<u8>>,
    pub service_uuids: Vec<Uuid>,
}

/// A classified BLE device observation.
///
/// Field order matches the persisted JSON object layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub rssi: i16,

    #[serde(rename = "addr")]
    pub address: String,

    #[serde(rename = "manuf")]
    pub manufacturer: Resolution,

    pub vendor: Resolution,

    #[serde(rename = "name", with = "falsy_text")]
    pub local_name: Option<String>,

    #[serde(rename = "uuid", with = "falsy_list")]
    pub service_uuids: Vec<String>,

    #[serde(rename = "up_time")]
    pub observed_at: f64,
}

/// Seconds since the Unix epoch, as stored in `up_time`.
pub fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or(0.0)
}

/// `Option<String>` on the wire: the string when present, `false` when absent.
mod falsy_text {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<String>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(text) => serializer.serialize_str(text),
            None => serializer.serialize_bool(false),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Flag(bool),
            Text(String),
        }
        Ok(match Wire::deserialize(deserializer)? {
            Wire::Text(text) => Some(text),
            Wire::Flag(_) => None,
        })
    }
}

/// `Vec<String>` on the wire: the array when non-empty, `false` otherwise.
mod falsy_list {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Vec<String>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        if value.is_empty() {
            serializer.serialize_bool(false)
        } else {
            serializer.collect_seq(value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<String>, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Flag(bool),
            List(Vec<String>),
        }
        Ok(match Wire::deserialize(deserializer)? {
            Wire::List(items) => items,
            Wire::Flag(_) => Vec::new(),
        })
    }
}
