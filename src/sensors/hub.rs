//! Routes characteristic notifications from connected sensors to decoders.
//!
//! The BLE transport (discovery, connection, subscription) lives outside this
//! crate. It hands the hub raw notification payloads tagged with the device
//! and characteristic they came from, plus connect/disconnect signals.

use crate::sensors::gatt::Characteristic;
use crate::sensors::heart_rate::decode_heart_rate;
use crate::sensors::power::PowerMeterDecoder;
use crate::sensors::types::{ConnectionState, SensorEvent, SensorReading, SensorType};
use crossbeam::channel::{Receiver, Sender};
use std::collections::HashMap;
use uuid::Uuid;

/// Decodes notifications from any number of connected sensors.
#[derive(Default)]
pub struct SensorHub {
    /// Channel for sending sensor events
    event_tx: Option<Sender<SensorEvent>>,
    /// Power meter decoders (device_id -> decoder)
    power_decoders: HashMap<String, PowerMeterDecoder>,
    /// Connection states (device_id -> state)
    connection_states: HashMap<String, ConnectionState>,
    /// Sensor type observed per device
    sensor_types: HashMap<String, SensorType>,
}

impl SensorHub {
    /// Create a hub with no known sensors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an event receiver for sensor events.
    ///
    /// Replaces any receiver handed out earlier.
    pub fn event_receiver(&mut self) -> Receiver<SensorEvent> {
        let (tx, rx) = crossbeam::channel::unbounded();
        self.event_tx = Some(tx);
        rx
    }

    /// Send an event if the channel is available.
    fn send_event(&self, event: SensorEvent) {
        if let Some(tx) = &self.event_tx {
            let _ = tx.send(event);
        }
    }

    /// Record a connection state change reported by the transport.
    ///
    /// A disconnect discards the device's crank revolution history.
    pub fn connection_changed(&mut self, device_id: &str, state: ConnectionState) {
        let previous = self
            .connection_states
            .insert(device_id.to_string(), state)
            .unwrap_or_default();

        if state == ConnectionState::Disconnected {
            if let Some(decoder) = self.power_decoders.get_mut(device_id) {
                decoder.reset();
            }
        }

        if previous != state {
            tracing::info!("Sensor {} {}", device_id, state);
        }

        self.send_event(SensorEvent::ConnectionChanged {
            device_id: device_id.to_string(),
            state,
        });
    }

    /// Decode a notification identified by characteristic UUID.
    ///
    /// Returns `None` for characteristics this crate does not decode.
    pub fn handle_notification(
        &mut self,
        device_id: &str,
        characteristic_uuid: &Uuid,
        data: &[u8],
    ) -> Option<SensorReading> {
        match Characteristic::from_uuid(characteristic_uuid) {
            Some(characteristic) => Some(self.decode(device_id, characteristic, data)),
            None => {
                tracing::warn!(
                    "Ignoring notification from {} on unsupported characteristic {}",
                    device_id,
                    characteristic_uuid
                );
                None
            }
        }
    }

    /// Decode a notification from a known characteristic.
    pub fn decode(
        &mut self,
        device_id: &str,
        characteristic: Characteristic,
        data: &[u8],
    ) -> SensorReading {
        let reading = match characteristic {
            Characteristic::HeartRateMeasurement => {
                SensorReading::HeartRate(decode_heart_rate(data))
            }
            Characteristic::CyclingPowerMeasurement => {
                let decoder = self
                    .power_decoders
                    .entry(device_id.to_string())
                    .or_default();
                SensorReading::Power(decoder.decode(data))
            }
        };

        tracing::debug!("{} {}: {:?}", device_id, characteristic, reading);

        self.sensor_types
            .insert(device_id.to_string(), SensorType::for_characteristic(characteristic));

        self.send_event(SensorEvent::Data {
            device_id: device_id.to_string(),
            reading: reading.clone(),
        });

        reading
    }

    /// Get the last reported connection state of a device.
    pub fn connection_state(&self, device_id: &str) -> ConnectionState {
        self.connection_states
            .get(device_id)
            .copied()
            .unwrap_or_default()
    }

    /// Get the sensor type a device has produced data for.
    pub fn sensor_type(&self, device_id: &str) -> Option<SensorType> {
        self.sensor_types.get(device_id).copied()
    }

    /// Get the ids of devices currently reported as connected.
    pub fn connected_devices(&self) -> Vec<String> {
        let mut devices: Vec<String> = self
            .connection_states
            .iter()
            .filter(|(_, state)| **state == ConnectionState::Connected)
            .map(|(id, _)| id.clone())
            .collect();
        devices.sort();
        devices
    }
}
