//! Jeedom records: eqLogics (configured devices) and their commands.
//!
//! Jeedom owns these records; the bridge only reads the few fields it needs
//! and keeps the rest as raw JSON.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Plugin name the eqLogics and configuration keys are registered under.
pub const PLUGIN: &str = "lgthinq";

/// A Jeedom command attached to an eqLogic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JeedomCommand {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "logicalId", default)]
    pub logical_id: String,
    #[serde(default)]
    pub name: String,
}

/// Raw eqLogic record as returned by `eqLogic::byType`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EqLogicRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "logicalId", default)]
    pub logical_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "isEnable", default, deserialize_with = "flag")]
    pub is_enable: bool,
    #[serde(rename = "isVisible", default, deserialize_with = "flag")]
    pub is_visible: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// An eqLogic with its commands indexed by `logicalId` and the last values
/// pushed to Jeedom.
#[derive(Debug, Clone)]
pub struct EqLogic {
    pub record: EqLogicRecord,
    commands: HashMap<String, JeedomCommand>,
    values: HashMap<String, Value>,
}

impl EqLogic {
    #[must_use]
    pub fn new(record: EqLogicRecord, commands: Vec<JeedomCommand>) -> Self {
        let commands = commands
            .into_iter()
            .map(|cmd| (cmd.logical_id.clone(), cmd))
            .collect();
        Self {
            record,
            commands,
            values: HashMap::new(),
        }
    }

    #[must_use]
    pub fn logical_id(&self) -> &str {
        &self.record.logical_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.record.name
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.record.is_enable
    }

    #[must_use]
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn command(&self, logical_id: &str) -> Option<&JeedomCommand> {
        self.commands.get(logical_id)
    }

    /// Record `value` for the command named `logical_id`.
    ///
    /// Returns the Jeedom command id when the value differs from the cached
    /// one (and must be pushed), `None` when the command is unknown or the
    /// value did not change.
    pub fn record_value(&mut self, logical_id: &str, value: &Value) -> Option<String> {
        let cmd = self.commands.get(logical_id)?;
        if self.values.get(&cmd.id) == Some(value) {
            return None;
        }
        self.values.insert(cmd.id.clone(), value.clone());
        Some(cmd.id.clone())
    }

    /// Drop a cached value so the next identical reading is pushed again.
    pub fn forget_value(&mut self, command_id: &str) {
        self.values.remove(command_id);
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

/// Jeedom encodes booleans as `"1"` / `"0"` (sometimes as numbers).
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => s == "1",
        Value::Number(n) => n.as_i64() == Some(1),
        _ => false,
    })
}
