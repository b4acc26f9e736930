//! Integration test with mock sensor notifications.
//!
//! Generates characteristic payloads the way real sensors send them and runs
//! them through the hub into an aggregator.

use ride_telemetry::location::LocationPoint;
use ride_telemetry::recording::aggregator::RideAggregator;
use ride_telemetry::recording::clock::ManualClock;
use ride_telemetry::recording::types::RecorderConfig;
use ride_telemetry::sensors::gatt::{
    Characteristic, CYCLING_POWER_MEASUREMENT_UUID, HEART_RATE_MEASUREMENT_UUID,
};
use ride_telemetry::sensors::hub::SensorHub;
use ride_telemetry::sensors::types::{ConnectionState, SensorEvent, SensorReading, SensorType};
use std::sync::Arc;
use uuid::Uuid;

/// Mock sensor data generator for testing.
pub struct MockSensorData {
    /// Current power value
    pub power: u16,
    /// Current heart rate
    pub heart_rate: u8,
    /// Cumulative crank revolutions
    pub crank_revolutions: u16,
    /// Last crank event time (1/1024 s)
    pub crank_event_time: u16,
}

impl Default for MockSensorData {
    fn default() -> Self {
        Self {
            power: 200,
            heart_rate: 145,
            crank_revolutions: 0,
            crank_event_time: 0,
        }
    }
}

impl MockSensorData {
    /// Advance the crank by whole revolutions at a steady cadence.
    pub fn pedal(&mut self, revolutions: u16, cadence_rpm: u16) {
        let ticks = (revolutions as u32 * 60 * 1024 / cadence_rpm as u32) as u16;
        self.crank_revolutions = self.crank_revolutions.wrapping_add(revolutions);
        self.crank_event_time = self.crank_event_time.wrapping_add(ticks);
    }

    /// Generate Cycling Power Measurement packet with crank data.
    pub fn generate_cycling_power_measurement(&self) -> Vec<u8> {
        // Flags: 0x0020 (crank revolution data)
        let mut data = vec![0x20, 0x00];
        data.extend_from_slice(&(self.power as i16).to_le_bytes());
        data.extend_from_slice(&self.crank_revolutions.to_le_bytes());
        data.extend_from_slice(&self.crank_event_time.to_le_bytes());
        data
    }

    /// Generate Heart Rate Measurement packet.
    pub fn generate_heart_rate_measurement(&self) -> Vec<u8> {
        // Flags: 0x00 (8-bit HR)
        vec![0x00, self.heart_rate]
    }
}

fn power_of(reading: Option<SensorReading>) -> (u16, Option<u16>) {
    match reading {
        Some(SensorReading::Power(power)) => (power.instant_power, power.cadence),
        other => panic!("expected a power reading, got {:?}", other),
    }
}

#[test]
fn test_mock_heart_rate_data_generation() {
    let mock = MockSensorData::default();
    let mut hub = SensorHub::new();

    let reading = hub.handle_notification(
        "hrm",
        &HEART_RATE_MEASUREMENT_UUID,
        &mock.generate_heart_rate_measurement(),
    );

    match reading {
        Some(SensorReading::HeartRate(hr)) => assert_eq!(hr.heart_rate, 145),
        other => panic!("expected a heart rate reading, got {:?}", other),
    }
    assert_eq!(hub.sensor_type("hrm"), Some(SensorType::HeartRate));
}

#[test]
fn test_mock_cycling_power_cadence() {
    let mut mock = MockSensorData::default();
    let mut hub = SensorHub::new();

    let (power, cadence) = power_of(hub.handle_notification(
        "pm",
        &CYCLING_POWER_MEASUREMENT_UUID,
        &mock.generate_cycling_power_measurement(),
    ));
    assert_eq!(power, 200);
    assert!(cadence.is_none());

    mock.pedal(2, 120);
    let (_, cadence) = power_of(hub.handle_notification(
        "pm",
        &CYCLING_POWER_MEASUREMENT_UUID,
        &mock.generate_cycling_power_measurement(),
    ));
    assert_eq!(cadence, Some(120));
    assert_eq!(hub.sensor_type("pm"), Some(SensorType::PowerMeter));
}

#[test]
fn test_cadence_through_counter_wrap() {
    let mut mock = MockSensorData {
        crank_revolutions: 65534,
        crank_event_time: 65000,
        ..Default::default()
    };
    let mut hub = SensorHub::new();
    let payload = mock.generate_cycling_power_measurement();
    hub.decode("pm", Characteristic::CyclingPowerMeasurement, &payload);

    mock.pedal(4, 90);
    let reading = hub.decode(
        "pm",
        Characteristic::CyclingPowerMeasurement,
        &mock.generate_cycling_power_measurement(),
    );
    assert_eq!(power_of(Some(reading)).1, Some(90));
}

#[test]
fn test_disconnect_discards_crank_history() {
    let mut mock = MockSensorData::default();
    let mut hub = SensorHub::new();
    hub.connection_changed("pm", ConnectionState::Connected);
    hub.decode(
        "pm",
        Characteristic::CyclingPowerMeasurement,
        &mock.generate_cycling_power_measurement(),
    );

    hub.connection_changed("pm", ConnectionState::Disconnected);
    hub.connection_changed("pm", ConnectionState::Connected);

    mock.pedal(2, 120);
    let reading = hub.decode(
        "pm",
        Characteristic::CyclingPowerMeasurement,
        &mock.generate_cycling_power_measurement(),
    );
    assert!(power_of(Some(reading)).1.is_none());
}

#[test]
fn test_power_meters_keep_separate_history() {
    let mut left = MockSensorData::default();
    let mut right = MockSensorData {
        crank_revolutions: 5000,
        crank_event_time: 30000,
        ..Default::default()
    };
    let mut hub = SensorHub::new();
    let cpm = Characteristic::CyclingPowerMeasurement;

    hub.decode("left", cpm, &left.generate_cycling_power_measurement());
    hub.decode("right", cpm, &right.generate_cycling_power_measurement());

    left.pedal(1, 60);
    right.pedal(2, 120);
    let left_reading = hub.decode("left", cpm, &left.generate_cycling_power_measurement());
    let right_reading = hub.decode("right", cpm, &right.generate_cycling_power_measurement());

    assert_eq!(power_of(Some(left_reading)).1, Some(60));
    assert_eq!(power_of(Some(right_reading)).1, Some(120));
}

#[test]
fn test_unsupported_characteristic_ignored() {
    let mut hub = SensorHub::new();
    // Battery Level
    let battery = Uuid::from_u128(0x0000_2a19_0000_1000_8000_0080_5f9b_34fb);

    assert!(hub.handle_notification("hrm", &battery, &[0x64]).is_none());
    assert!(hub.sensor_type("hrm").is_none());
}

#[test]
fn test_event_channel() {
    let mock = MockSensorData::default();
    let mut hub = SensorHub::new();
    let events = hub.event_receiver();

    hub.connection_changed("hrm", ConnectionState::Connected);
    hub.decode(
        "hrm",
        Characteristic::HeartRateMeasurement,
        &mock.generate_heart_rate_measurement(),
    );

    assert_eq!(
        events.try_recv().unwrap(),
        SensorEvent::ConnectionChanged {
            device_id: "hrm".to_string(),
            state: ConnectionState::Connected,
        }
    );
    match events.try_recv().unwrap() {
        SensorEvent::Data { device_id, reading } => {
            assert_eq!(device_id, "hrm");
            assert_eq!(reading.sensor_type(), SensorType::HeartRate);
        }
        other => panic!("unexpected event {:?}", other),
    }
    assert!(events.try_recv().is_err());
}

#[test]
fn test_connected_devices() {
    let mut hub = SensorHub::new();
    hub.connection_changed("pm", ConnectionState::Connected);
    hub.connection_changed("hrm", ConnectionState::Connected);
    hub.connection_changed("old", ConnectionState::Connected);
    hub.connection_changed("old", ConnectionState::Disconnected);

    assert_eq!(hub.connected_devices(), vec!["hrm".to_string(), "pm".to_string()]);
    assert_eq!(hub.connection_state("old"), ConnectionState::Disconnected);
    assert_eq!(hub.connection_state("unknown"), ConnectionState::Disconnected);
}

#[test]
fn test_sensor_readings_reach_samples() {
    let clock = ManualClock::from_millis(0);
    let mut aggregator =
        RideAggregator::with_clock(RecorderConfig::default(), Arc::new(clock.clone()));
    let mut hub = SensorHub::new();
    let mut mock = MockSensorData {
        power: 230,
        heart_rate: 152,
        ..Default::default()
    };

    aggregator.start();
    for second in 0..5i64 {
        clock.set_millis(second * 1000);
        for (uuid, payload) in [
            (HEART_RATE_MEASUREMENT_UUID, mock.generate_heart_rate_measurement()),
            (CYCLING_POWER_MEASUREMENT_UUID, mock.generate_cycling_power_measurement()),
        ] {
            if let Some(reading) = hub.handle_notification("dev", &uuid, &payload) {
                aggregator.apply_reading(&reading);
            }
        }
        aggregator.process_point(
            LocationPoint::new(45.0 + second as f64 * 0.0001, 7.0, second * 1000).with_speed(8.0),
        );
        mock.pedal(3, 90);
    }

    let points = aggregator.data_points();
    assert_eq!(points.len(), 5);
    assert_eq!(points[0].heart_rate, Some(152));
    assert_eq!(points[0].power, Some(230));
    assert_eq!(points[0].cadence, None);
    assert!(points[1..].iter().all(|p| p.cadence == Some(90)));
    assert_eq!(aggregator.current_cadence(), Some(90));

    let summary = aggregator.stop().unwrap();
    assert_eq!(summary.avg_heart_rate, Some(152));
    assert_eq!(summary.max_power, Some(230));
}
