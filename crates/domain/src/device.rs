//! Device: an LG appliance registered on the user's ThinQ account.

use std::fmt;

use serde::{Serialize, Serializer};

/// Kind of appliance, keyed by the numeric code the cloud reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    Refrigerator,
    KimchiRefrigerator,
    WaterPurifier,
    Washer,
    Dryer,
    Styler,
    Dishwasher,
    Oven,
    Microwave,
    Cooktop,
    Hood,
    Ac,
    AirPurifier,
    Dehumidifier,
    RobotKing,
    Unknown(u32),
}

impl DeviceType {
    #[must_use]
    pub fn from_code(code: u32) -> Self {
        match code {
            101 => Self::Refrigerator,
            102 => Self::KimchiRefrigerator,
            103 => Self::WaterPurifier,
            201 => Self::Washer,
            202 => Self::Dryer,
            203 => Self::Styler,
            204 => Self::Dishwasher,
            301 => Self::Oven,
            302 => Self::Microwave,
            303 => Self::Cooktop,
            304 => Self::Hood,
            401 => Self::Ac,
            402 => Self::AirPurifier,
            403 => Self::Dehumidifier,
            501 => Self::RobotKing,
            other => Self::Unknown(other),
        }
    }

    #[must_use]
    pub fn code(self) -> u32 {
        match self {
            Self::Refrigerator => 101,
            Self::KimchiRefrigerator => 102,
            Self::WaterPurifier => 103,
            Self::Washer => 201,
            Self::Dryer => 202,
            Self::Styler => 203,
            Self::Dishwasher => 204,
            Self::Oven => 301,
            Self::Microwave => 302,
            Self::Cooktop => 303,
            Self::Hood => 304,
            Self::Ac => 401,
            Self::AirPurifier => 402,
            Self::Dehumidifier => 403,
            Self::RobotKing => 501,
            Self::Unknown(code) => code,
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Refrigerator => "REFRIGERATOR",
            Self::KimchiRefrigerator => "KIMCHI_REFRIGERATOR",
            Self::WaterPurifier => "WATER_PURIFIER",
            Self::Washer => "WASHER",
            Self::Dryer => "DRYER",
            Self::Styler => "STYLER",
            Self::Dishwasher => "DISHWASHER",
            Self::Oven => "OVEN",
            Self::Microwave => "MICROWAVE",
            Self::Cooktop => "COOKTOP",
            Self::Hood => "HOOD",
            Self::Ac => "AC",
            Self::AirPurifier => "AIR_PURIFIER",
            Self::Dehumidifier => "DEHUMIDIFIER",
            Self::RobotKing => "ROBOT_KING",
            Self::Unknown(code) => return write!(f, "UNKNOWN_{code}"),
        };
        f.write_str(name)
    }
}

impl Serialize for DeviceType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A device as listed by `/ls`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub model: String,
}

impl DeviceInfo {
    #[must_use]
    pub fn is_ac(&self) -> bool {
        self.device_type == DeviceType::Ac
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_map_known_codes_both_ways() {
        for code in [101, 201, 202, 401, 501] {
            assert_eq!(DeviceType::from_code(code).code(), code);
        }
        assert_eq!(DeviceType::from_code(201), DeviceType::Washer);
    }

    #[test]
    fn should_keep_unknown_code() {
        let kind = DeviceType::from_code(9999);
        assert_eq!(kind, DeviceType::Unknown(9999));
        assert_eq!(kind.to_string(), "UNKNOWN_9999");
    }

    #[test]
    fn should_serialize_listing_shape() {
        let device = DeviceInfo {
            id: "dev-1".to_string(),
            name: "WASHER".to_string(),
            device_type: DeviceType::Washer,
            model: "F3L2CYV5W_WIFI".to_string(),
        };
        let json = serde_json::to_value(&device).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "dev-1",
                "name": "WASHER",
                "type": "WASHER",
                "model": "F3L2CYV5W_WIFI",
            })
        );
    }
}
