//! Virtual washer: runs a cotton cycle that counts down one minute per
//! delivered status.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::{Value, json};

use thinq_bridge_domain::device::{DeviceInfo, DeviceType};
use thinq_bridge_domain::model::{ModelInfo, ValueDescriptor};

const STATE_RUNNING: &str = "30";
const STATE_END: &str = "60";

struct Cycle {
    remaining_minutes: u32,
    initial_minutes: u32,
}

/// A simulated washing machine.
pub struct VirtualWasher {
    cycle: Mutex<Cycle>,
}

impl Default for VirtualWasher {
    fn default() -> Self {
        Self::with_remaining(73)
    }
}

impl VirtualWasher {
    pub const ID: &'static str = "virtual-washer";
    /// Device type code the cloud reports for washers.
    pub const TYPE_CODE: u32 = 201;

    /// A washer whose running cycle ends in `minutes`.
    #[must_use]
    pub fn with_remaining(minutes: u32) -> Self {
        Self {
            cycle: Mutex::new(Cycle {
                remaining_minutes: minutes,
                initial_minutes: minutes,
            }),
        }
    }

    #[must_use]
    pub fn info(&self) -> DeviceInfo {
        DeviceInfo {
            id: Self::ID.to_string(),
            name: "Washer".to_string(),
            device_type: DeviceType::from_code(Self::TYPE_CODE),
            model: "F4J6TY0W_WIFI".to_string(),
        }
    }

    #[must_use]
    pub fn model(&self) -> ModelInfo {
        let mut values = BTreeMap::new();
        values.insert(
            "State".to_string(),
            enumeration(&[
                ("0", "POWER_OFF"),
                ("1", "INITIAL"),
                ("6", "PAUSE"),
                (STATE_RUNNING, "RUNNING"),
                ("40", "RINSING"),
                ("50", "SPINNING"),
                (STATE_END, "END"),
            ]),
        );
        values.insert(
            "Error".to_string(),
            enumeration(&[("0", "ERROR_NOERROR"), ("1", "ERROR_DE2"), ("2", "ERROR_IE")]),
        );
        values.insert("Remain_Time_H".to_string(), range(0, 24));
        values.insert("Remain_Time_M".to_string(), range(0, 59));
        values.insert("Initial_Time_H".to_string(), range(0, 24));
        values.insert("Initial_Time_M".to_string(), range(0, 59));
        values.insert("Course".to_string(), ValueDescriptor::Other);
        ModelInfo { values }
    }

    /// Current raw status, then advance the cycle by one minute.
    pub fn snapshot(&self) -> Value {
        let mut cycle = self.lock();
        let state = if cycle.remaining_minutes == 0 {
            STATE_END
        } else {
            STATE_RUNNING
        };
        let snapshot = json!({
            "State": state,
            "Error": "0",
            "Course": "6",
            "Remain_Time_H": (cycle.remaining_minutes / 60).to_string(),
            "Remain_Time_M": (cycle.remaining_minutes % 60).to_string(),
            "Initial_Time_H": (cycle.initial_minutes / 60).to_string(),
            "Initial_Time_M": (cycle.initial_minutes % 60).to_string(),
        });
        cycle.remaining_minutes = cycle.remaining_minutes.saturating_sub(1);
        snapshot
    }

    fn lock(&self) -> MutexGuard<'_, Cycle> {
        self.cycle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub(crate) fn enumeration(options: &[(&str, &str)]) -> ValueDescriptor {
    ValueDescriptor::Enum {
        options: options
            .iter()
            .map(|(code, label)| ((*code).to_string(), (*label).to_string()))
            .collect(),
    }
}

pub(crate) fn range(min: i64, max: i64) -> ValueDescriptor {
    ValueDescriptor::Range { min, max, step: 1 }
}
