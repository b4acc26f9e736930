//! Cycling Power Measurement (0x2A63) decoding.
//!
//! Payload layout:
//! - Bytes 0-1: flags (u16 LE)
//! - Bytes 2-3: instantaneous power (i16 LE, watts)
//! - Optional fields in flag order:
//!   - bit 0: pedal power balance (u8, 1/2 percent)
//!   - bit 2: accumulated torque (u16, skipped)
//!   - bit 4: wheel revolution data (u32 + u16, skipped)
//!   - bit 5: crank revolution data (u16 cumulative revolutions, u16 last event time in 1/1024 s)
//!
//! Cadence is not transmitted; it is derived from two consecutive crank
//! events, so the decoder keeps the previous event per sensor.

use serde::{Deserialize, Serialize};

/// Crank event time resolution (ticks per second).
const CRANK_EVENT_TICKS_PER_SECOND: f64 = 1024.0;

/// A decoded Cycling Power Measurement notification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerReading {
    /// Instantaneous power in watts, negative values clamped to 0
    pub instant_power: u16,
    /// Pedal power balance percentage (0-100, 0.5 resolution)
    pub pedal_power_balance: Option<f32>,
    /// Cadence in RPM derived from consecutive crank events
    pub cadence: Option<u16>,
}

/// Last crank revolution event seen by a decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CrankSnapshot {
    revolutions: u16,
    event_time: u16,
}

/// Stateful Cycling Power Measurement decoder.
///
/// One decoder belongs to one power meter. Call [`PowerMeterDecoder::reset`]
/// when that sensor disconnects so stale crank history is not used as the
/// baseline for the next connection.
#[derive(Debug, Default)]
pub struct PowerMeterDecoder {
    last_crank: Option<CrankSnapshot>,
}

impl PowerMeterDecoder {
    /// Create a decoder with no crank history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous crank event.
    pub fn reset(&mut self) {
        self.last_crank = None;
    }

    /// Whether a crank event baseline is held.
    pub fn has_crank_baseline(&self) -> bool {
        self.last_crank.is_some()
    }

    /// Decode a Cycling Power Measurement notification.
    ///
    /// Never fails: a payload shorter than four bytes yields zero power, and
    /// an optional field cut off by the end of the payload is treated as absent.
    pub fn decode(&mut self, data: &[u8]) -> PowerReading {
        if data.len() < 4 {
            return PowerReading::default();
        }

        let flags = u16::from_le_bytes([data[0], data[1]]);
        let power = i16::from_le_bytes([data[2], data[3]]);

        let mut result = PowerReading {
            instant_power: power.max(0) as u16,
            ..Default::default()
        };

        let mut offset = 4usize;

        // Pedal Power Balance (bit 0)
        if (flags & 0x0001) != 0 {
            if offset < data.len() {
                result.pedal_power_balance = Some(data[offset] as f32 / 2.0);
            }
            offset += 1;
        }

        // Accumulated Torque (bit 2)
        if (flags & 0x0004) != 0 {
            offset += 2;
        }

        // Wheel Revolution Data (bit 4)
        if (flags & 0x0010) != 0 {
            offset += 6;
        }

        // Crank Revolution Data (bit 5)
        if (flags & 0x0020) != 0 && offset + 4 <= data.len() {
            let snapshot = CrankSnapshot {
                revolutions: u16::from_le_bytes([data[offset], data[offset + 1]]),
                event_time: u16::from_le_bytes([data[offset + 2], data[offset + 3]]),
            };
            if let Some(previous) = self.last_crank {
                result.cadence = cadence_between(previous, snapshot);
            }
            self.last_crank = Some(snapshot);
        }

        result
    }
}

/// Cadence in RPM between two crank events, if the crank moved forward in time.
fn cadence_between(previous: CrankSnapshot, current: CrankSnapshot) -> Option<u16> {
    // Both counters are 16-bit on the wire and wrap at 65536
    let rev_delta = current.revolutions.wrapping_sub(previous.revolutions);
    let time_delta = current.event_time.wrapping_sub(previous.event_time);

    if rev_delta == 0 || time_delta == 0 {
        return None;
    }

    let time_seconds = time_delta as f64 / CRANK_EVENT_TICKS_PER_SECOND;
    let cadence = (rev_delta as f64 / time_seconds) * 60.0;

    // Float to int casts saturate
    Some(cadence.round() as u16)
}
