//! Sensor types shared by the decoders and the sensor hub.

use serde::{Deserialize, Serialize};

use crate::sensors::gatt::Characteristic;
use crate::sensors::heart_rate::HeartRateReading;
use crate::sensors::power::PowerReading;

/// Type of fitness sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorType {
    /// Standalone power meter
    PowerMeter,
    /// Heart rate monitor
    HeartRate,
}

impl SensorType {
    /// The sensor type that produces notifications on a characteristic.
    pub fn for_characteristic(characteristic: Characteristic) -> Self {
        match characteristic {
            Characteristic::HeartRateMeasurement => SensorType::HeartRate,
            Characteristic::CyclingPowerMeasurement => SensorType::PowerMeter,
        }
    }
}

impl std::fmt::Display for SensorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SensorType::PowerMeter => write!(f, "Power Meter"),
            SensorType::HeartRate => write!(f, "Heart Rate"),
        }
    }
}

/// Connection state of a sensor, as reported by the BLE transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// Not connected
    #[default]
    Disconnected,
    /// Active connection
    Connected,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "Disconnected"),
            ConnectionState::Connected => write!(f, "Connected"),
        }
    }
}

/// A decoded notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SensorReading {
    /// Heart Rate Measurement
    HeartRate(HeartRateReading),
    /// Cycling Power Measurement
    Power(PowerReading),
}

impl SensorReading {
    /// The kind of sensor that produced this reading.
    pub fn sensor_type(&self) -> SensorType {
        match self {
            SensorReading::HeartRate(_) => SensorType::HeartRate,
            SensorReading::Power(_) => SensorType::PowerMeter,
        }
    }
}

/// Events from the sensor hub.
#[derive(Debug, Clone, PartialEq)]
pub enum SensorEvent {
    /// Sensor connection state changed
    ConnectionChanged {
        device_id: String,
        state: ConnectionState,
    },
    /// New data decoded from a sensor
    Data {
        device_id: String,
        reading: SensorReading,
    },
}
