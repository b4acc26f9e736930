//! Sensor module for decoding BLE heart rate and cycling power notifications.

pub mod gatt;
pub mod heart_rate;
pub mod hub;
pub mod power;
pub mod types;

pub use gatt::Characteristic;
pub use heart_rate::{decode_heart_rate, HeartRateReading};
pub use hub::SensorHub;
pub use power::{PowerMeterDecoder, PowerReading};
pub use types::{ConnectionState, SensorEvent, SensorReading, SensorType};
