//! GATT service and characteristic identifiers for the supported sensors.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Heart Rate Service UUID (0x180D)
pub const HEART_RATE_SERVICE_UUID: Uuid =
    Uuid::from_u128(0x0000_180d_0000_1000_8000_0080_5f9b_34fb);

/// Heart Rate Measurement UUID (0x2A37)
pub const HEART_RATE_MEASUREMENT_UUID: Uuid =
    Uuid::from_u128(0x0000_2a37_0000_1000_8000_0080_5f9b_34fb);

/// Cycling Power Service UUID (0x1818)
pub const CYCLING_POWER_SERVICE_UUID: Uuid =
    Uuid::from_u128(0x0000_1818_0000_1000_8000_0080_5f9b_34fb);

/// Cycling Power Measurement UUID (0x2A63)
pub const CYCLING_POWER_MEASUREMENT_UUID: Uuid =
    Uuid::from_u128(0x0000_2a63_0000_1000_8000_0080_5f9b_34fb);

/// A characteristic whose notifications this crate knows how to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Characteristic {
    /// Heart Rate Measurement (0x2A37)
    HeartRateMeasurement,
    /// Cycling Power Measurement (0x2A63)
    CyclingPowerMeasurement,
}

impl Characteristic {
    /// Resolve a characteristic from its UUID.
    pub fn from_uuid(uuid: &Uuid) -> Option<Self> {
        if *uuid == HEART_RATE_MEASUREMENT_UUID {
            Some(Characteristic::HeartRateMeasurement)
        } else if *uuid == CYCLING_POWER_MEASUREMENT_UUID {
            Some(Characteristic::CyclingPowerMeasurement)
        } else {
            None
        }
    }

    /// The characteristic UUID.
    pub fn uuid(&self) -> Uuid {
        match self {
            Characteristic::HeartRateMeasurement => HEART_RATE_MEASUREMENT_UUID,
            Characteristic::CyclingPowerMeasurement => CYCLING_POWER_MEASUREMENT_UUID,
        }
    }

    /// The UUID of the service that carries this characteristic.
    pub fn service_uuid(&self) -> Uuid {
        match self {
            Characteristic::HeartRateMeasurement => HEART_RATE_SERVICE_UUID,
            Characteristic::CyclingPowerMeasurement => CYCLING_POWER_SERVICE_UUID,
        }
    }
}

impl std::fmt::Display for Characteristic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Characteristic::HeartRateMeasurement => write!(f, "Heart Rate Measurement"),
            Characteristic::CyclingPowerMeasurement => write!(f, "Cycling Power Measurement"),
        }
    }
}
