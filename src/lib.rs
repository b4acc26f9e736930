//! Ride Telemetry - BLE cycling sensor decoding and GPS ride aggregation
//!
//! Decodes Heart Rate Measurement and Cycling Power Measurement notifications
//! (including cadence derived from rollover-safe crank revolution counters),
//! and aggregates a stream of GPS fixes and sensor readings into live ride
//! statistics, a per-fix sample log and a session summary.

pub mod location;
pub mod metrics;
pub mod recording;
pub mod replay;
pub mod sensors;
pub mod storage;

// Re-export commonly used types
pub use location::{haversine_distance, LocationPoint};
pub use recording::aggregator::RideAggregator;
pub use recording::shared::SharedRideAggregator;
pub use sensors::heart_rate::{decode_heart_rate, HeartRateReading};
pub use sensors::hub::SensorHub;
pub use sensors::power::{PowerMeterDecoder, PowerReading};
pub use storage::config::AppConfig;
