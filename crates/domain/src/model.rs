//! Model info: per-model value descriptors used to decode monitor payloads.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Decoded, human readable device status as returned by `/mon`.
pub type DeviceStatus = Map<String, Value>;

/// How a single status value must be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ValueDescriptor {
    /// Raw codes mapped to labels.
    Enum { options: BTreeMap<String, String> },
    /// Numeric value within bounds.
    Range { min: i64, max: i64, step: i64 },
    /// Anything the bridge does not interpret (bit fields, references, …).
    Other,
}

/// A monitor payload that is not a JSON object.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("monitor payload is not valid JSON")]
    Json(#[from] serde_json::Error),

    #[error("monitor payload is not a JSON object")]
    NotAnObject,
}

/// Value descriptors for one appliance model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub values: BTreeMap<String, ValueDescriptor>,
}

impl ModelInfo {
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&ValueDescriptor> {
        self.values.get(key)
    }

    /// Parse a raw monitor payload and describe it.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] when the payload is not a JSON object.
    pub fn decode_monitor(&self, payload: &[u8]) -> Result<DeviceStatus, DecodeError> {
        match serde_json::from_slice(payload)? {
            Value::Object(raw) => Ok(self.describe(&raw)),
            _ => Err(DecodeError::NotAnObject),
        }
    }

    /// Translate raw values with the model descriptors.
    ///
    /// Enum codes become labels (the raw code stays when no label exists),
    /// ranges gain `<key>.min` / `<key>.max` siblings, and everything else
    /// passes through untouched.
    #[must_use]
    pub fn describe(&self, raw: &Map<String, Value>) -> DeviceStatus {
        let mut status = DeviceStatus::new();
        for (key, value) in raw {
            match self.value(key) {
                Some(ValueDescriptor::Enum { options }) => {
                    let label = options
                        .get(&option_key(value))
                        .map_or_else(|| value.clone(), |label| Value::String(label.clone()));
                    status.insert(key.clone(), label);
                }
                Some(ValueDescriptor::Range { min, max, .. }) => {
                    status.insert(key.clone(), value.clone());
                    status.insert(format!("{key}.min"), Value::from(*min));
                    status.insert(format!("{key}.max"), Value::from(*max));
                }
                Some(ValueDescriptor::Other) | None => {
                    status.insert(key.clone(), value.clone());
                }
            }
        }
        status
    }
}

fn option_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
