//! Commands that can be sent to an appliance through the dispatch table.

use crate::error::{BridgeError, NotFoundError, ValidationError};

/// A control command understood by the cloud port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCommand {
    /// Configured temperature, in degrees Fahrenheit.
    SetTemperature { fahrenheit: i32 },
    /// Power on (`true`) or off.
    Power(bool),
}

/// A parsed `/cmd/{name}/{device}/{arg}` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Send(DeviceCommand),
    /// Read the AC configuration instead of writing anything.
    AcConfig,
}

impl Dispatch {
    /// Parse a command name and its optional argument.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::NotFound`] for unknown command names and
    /// [`BridgeError::Validation`] when the argument is missing or malformed.
    pub fn parse(name: &str, arg: Option<&str>) -> Result<Self, BridgeError> {
        match name {
            "set-temp" | "set_temp" => {
                let value = arg.ok_or(ValidationError::MissingArgument("set-temp"))?;
                let fahrenheit =
                    value
                        .parse::<i32>()
                        .map_err(|_| ValidationError::InvalidArgument {
                            command: "set-temp",
                            value: value.to_string(),
                        })?;
                Ok(Self::Send(DeviceCommand::SetTemperature { fahrenheit }))
            }
            "turn" => match arg.ok_or(ValidationError::MissingArgument("turn"))? {
                "on" => Ok(Self::Send(DeviceCommand::Power(true))),
                "off" => Ok(Self::Send(DeviceCommand::Power(false))),
                other => Err(ValidationError::InvalidArgument {
                    command: "turn",
                    value: other.to_string(),
                }
                .into()),
            },
            "ac-config" | "ac_config" => Ok(Self::AcConfig),
            other => Err(NotFoundError {
                entity: "command",
                id: other.to_string(),
            }
            .into()),
        }
    }
}
