//! Virtual air conditioner: accepts power and target temperature commands.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::{Value, json};

use thinq_bridge_domain::command::DeviceCommand;
use thinq_bridge_domain::device::{DeviceInfo, DeviceType};
use thinq_bridge_domain::error::CloudError;
use thinq_bridge_domain::model::ModelInfo;

use super::washer::{enumeration, range};

/// Accepted target temperatures, in Celsius.
const TARGET_MIN: i32 = 18;
const TARGET_MAX: i32 = 30;

struct Settings {
    on: bool,
    target_celsius: i32,
    current_celsius: i32,
}

/// A simulated split air conditioner.
pub struct VirtualAirConditioner {
    settings: Mutex<Settings>,
}

impl Default for VirtualAirConditioner {
    fn default() -> Self {
        Self {
            settings: Mutex::new(Settings {
                on: false,
                target_celsius: 22,
                current_celsius: 26,
            }),
        }
    }
}

impl VirtualAirConditioner {
    pub const ID: &'static str = "virtual-ac";
    /// Device type code the cloud reports for air conditioners.
    pub const TYPE_CODE: u32 = 401;

    #[must_use]
    pub fn info(&self) -> DeviceInfo {
        DeviceInfo {
            id: Self::ID.to_string(),
            name: "Air Conditioner".to_string(),
            device_type: DeviceType::from_code(Self::TYPE_CODE),
            model: "RAC_056905_WW".to_string(),
        }
    }

    #[must_use]
    pub fn model(&self) -> ModelInfo {
        let mut values = BTreeMap::new();
        values.insert(
            "Operation".to_string(),
            enumeration(&[("0", "OFF"), ("1", "ON")]),
        );
        values.insert(
            "OpMode".to_string(),
            enumeration(&[("0", "COOL"), ("1", "DRY"), ("2", "FAN"), ("4", "HEAT")]),
        );
        values.insert(
            "TempCfg".to_string(),
            range(i64::from(TARGET_MIN), i64::from(TARGET_MAX)),
        );
        values.insert("TempCur".to_string(), range(16, 35));
        ModelInfo { values }
    }

    /// Current raw status; a running unit drifts one degree toward its
    /// target per snapshot.
    pub fn snapshot(&self) -> Value {
        let mut settings = self.lock();
        let snapshot = json!({
            "Operation": if settings.on { "1" } else { "0" },
            "OpMode": "0",
            "TempCfg": settings.target_celsius.to_string(),
            "TempCur": settings.current_celsius.to_string(),
        });
        if settings.on {
            let step = (settings.target_celsius - settings.current_celsius).signum();
            settings.current_celsius += step;
        }
        snapshot
    }

    /// Apply a control command.
    ///
    /// # Errors
    ///
    /// Returns a cloud API error when the temperature is out of range.
    pub fn apply(&self, command: DeviceCommand) -> Result<(), CloudError> {
        let mut settings = self.lock();
        match command {
            DeviceCommand::Power(on) => settings.on = on,
            DeviceCommand::SetTemperature { fahrenheit } => {
                let celsius = fahrenheit_to_celsius(fahrenheit);
                if !(TARGET_MIN..=TARGET_MAX).contains(&celsius) {
                    return Err(CloudError::Api {
                        code: "0106".to_string(),
                        message: format!("temperature {fahrenheit}F out of range"),
                    });
                }
                settings.target_celsius = celsius;
            }
        }
        Ok(())
    }

    /// Filter, energy and power readings.
    #[must_use]
    pub fn config(&self) -> Value {
        let settings = self.lock();
        json!({
            "filter": {"used": 412, "max": 2000},
            "energy_target": 0,
            "power": if settings.on { 1150 } else { 0 },
            "volts": 230,
            "light": true,
        })
    }

    fn lock(&self) -> MutexGuard<'_, Settings> {
        self.settings.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Whole-degree conversion, rounded to the nearest degree.
fn fahrenheit_to_celsius(fahrenheit: i32) -> i32 {
    let tenths = (fahrenheit - 32) * 50 / 9;
    (tenths + 5 * tenths.signum()) / 10
}
