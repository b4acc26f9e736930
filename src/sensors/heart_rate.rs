//! Heart Rate Measurement (0x2A37) decoding.
//!
//! Payload layout:
//! - Byte 0: flags
//!   - bit 0: heart rate value format (0 = u8, 1 = u16 LE)
//!   - bit 1: sensor contact detected
//!   - bit 2: sensor contact status supported
//!   - bit 3: energy expended present (u16 LE, kJ)
//!   - bit 4: one or more RR intervals present (u16 LE each, 1/1024 s)
//! - Heart rate value, then energy expended, then RR intervals to the end.

use serde::{Deserialize, Serialize};

/// A decoded Heart Rate Measurement notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartRateReading {
    /// Heart rate in BPM (0 when the payload is too short)
    pub heart_rate: u16,
    /// Skin contact state, only when the sensor supports contact detection
    pub contact_detected: Option<bool>,
    /// Cumulative energy expended in kJ since the sensor was reset
    pub energy_expended: Option<u16>,
    /// RR intervals in milliseconds, oldest first
    pub rr_intervals: Option<Vec<u16>>,
}

/// Convert a raw RR interval (1/1024 s) to whole milliseconds.
pub fn rr_interval_to_ms(raw: u16) -> u16 {
    (raw as f64 / 1024.0 * 1000.0).round() as u16
}

/// Decode a Heart Rate Measurement notification.
///
/// Never fails: a payload shorter than two bytes yields a zero heart rate,
/// and truncated optional fields are left out.
pub fn decode_heart_rate(data: &[u8]) -> HeartRateReading {
    if data.len() < 2 {
        return HeartRateReading::default();
    }

    let flags = data[0];
    let hr_format_u16 = (flags & 0x01) != 0;
    let contact_detected = (flags & 0x02) != 0;
    let contact_supported = (flags & 0x04) != 0;
    let energy_expended_present = (flags & 0x08) != 0;
    let rr_interval_present = (flags & 0x10) != 0;

    let mut offset = 1usize;

    let heart_rate = if hr_format_u16 {
        if offset + 2 > data.len() {
            tracing::debug!("Heart rate payload truncated: {:02x?}", data);
            return HeartRateReading::default();
        }
        let hr = u16::from_le_bytes([data[offset], data[offset + 1]]);
        offset += 2;
        hr
    } else {
        let hr = data[offset] as u16;
        offset += 1;
        hr
    };

    let mut result = HeartRateReading {
        heart_rate,
        contact_detected: contact_supported.then_some(contact_detected),
        ..Default::default()
    };

    if energy_expended_present && offset + 2 <= data.len() {
        result.energy_expended = Some(u16::from_le_bytes([data[offset], data[offset + 1]]));
        offset += 2;
    }

    if rr_interval_present {
        let mut intervals = Vec::with_capacity((data.len().saturating_sub(offset)) / 2);
        while offset + 2 <= data.len() {
            let raw = u16::from_le_bytes([data[offset], data[offset + 1]]);
            intervals.push(rr_interval_to_ms(raw));
            offset += 2;
        }
        result.rr_intervals = Some(intervals);
    }

    result
}
