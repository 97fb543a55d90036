//! Virtual appliances: washer and air conditioner.
//!
//! Each appliance has a fixed id so it stays stable across restarts.

mod air_conditioner;
mod washer;

pub use air_conditioner::VirtualAirConditioner;
pub use washer::VirtualWasher;

use serde_json::Value;

use thinq_bridge_domain::command::DeviceCommand;
use thinq_bridge_domain::device::DeviceInfo;
use thinq_bridge_domain::error::CloudError;
use thinq_bridge_domain::model::ModelInfo;

/// Wrapper enum for the concrete virtual appliances.
pub enum VirtualDevice {
    Washer(VirtualWasher),
    AirConditioner(VirtualAirConditioner),
}

impl VirtualDevice {
    #[must_use]
    pub fn info(&self) -> DeviceInfo {
        match self {
            Self::Washer(d) => d.info(),
            Self::AirConditioner(d) => d.info(),
        }
    }

    #[must_use]
    pub fn model(&self) -> ModelInfo {
        match self {
            Self::Washer(d) => d.model(),
            Self::AirConditioner(d) => d.model(),
        }
    }

    pub fn snapshot(&self) -> Value {
        match self {
            Self::Washer(d) => d.snapshot(),
            Self::AirConditioner(d) => d.snapshot(),
        }
    }

    /// # Errors
    ///
    /// Returns a cloud API error when the appliance does not accept
    /// commands or rejects the value.
    pub fn apply(&self, command: DeviceCommand) -> Result<(), CloudError> {
        match self {
            Self::AirConditioner(d) => d.apply(command),
            Self::Washer(_) => Err(unsupported(&self.info())),
        }
    }

    /// # Errors
    ///
    /// Returns a cloud API error for appliances without AC configuration.
    pub fn config(&self) -> Result<Value, CloudError> {
        match self {
            Self::AirConditioner(d) => Ok(d.config()),
            Self::Washer(_) => Err(unsupported(&self.info())),
        }
    }
}

fn unsupported(info: &DeviceInfo) -> CloudError {
    CloudError::Api {
        code: "0100".to_string(),
        message: format!(
            "command not supported by {} (device type {})",
            info.name,
            info.device_type.code()
        ),
    }
}
