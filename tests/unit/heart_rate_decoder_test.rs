//! Unit tests for Heart Rate Measurement decoding.

use ride_telemetry::sensors::heart_rate::{decode_heart_rate, rr_interval_to_ms};

#[test]
fn test_decode_u8_format() {
    // Flags: 0x00 (8-bit HR)
    // HR: 145 BPM
    let data = [0x00, 0x91];
    let result = decode_heart_rate(&data);

    assert_eq!(result.heart_rate, 145);
    assert!(result.contact_detected.is_none());
    assert!(result.energy_expended.is_none());
    assert!(result.rr_intervals.is_none());
}

#[test]
fn test_decode_u16_format() {
    // Flags: 0x01 (16-bit HR)
    // HR: 300 BPM
    let data = [0x01, 0x2C, 0x01];
    let result = decode_heart_rate(&data);

    assert_eq!(result.heart_rate, 300);
}

#[test]
fn test_decode_with_sensor_contact() {
    // Flags: 0x06 (contact supported + detected)
    let result = decode_heart_rate(&[0x06, 0x78]);

    assert_eq!(result.heart_rate, 120);
    assert_eq!(result.contact_detected, Some(true));
}

#[test]
fn test_decode_contact_supported_not_detected() {
    // Flags: 0x04 (contact supported, not detected)
    let result = decode_heart_rate(&[0x04, 0x64]);

    assert_eq!(result.heart_rate, 100);
    assert_eq!(result.contact_detected, Some(false));
}

#[test]
fn test_contact_bit_ignored_when_unsupported() {
    // Flags: 0x02 (detected bit set but support bit clear)
    let result = decode_heart_rate(&[0x02, 0x64]);

    assert!(result.contact_detected.is_none());
}

#[test]
fn test_decode_energy_expended() {
    // Flags: 0x08 (energy expended)
    // HR: 100, energy: 1000 kJ
    let data = [0x08, 0x64, 0xE8, 0x03];
    let result = decode_heart_rate(&data);

    assert_eq!(result.heart_rate, 100);
    assert_eq!(result.energy_expended, Some(1000));
}

#[test]
fn test_decode_rr_intervals() {
    // Flags: 0x10 (RR present)
    // HR: 72, RR: 1024/1024 s and 768/1024 s
    let data = [0x10, 0x48, 0x00, 0x04, 0x00, 0x03];
    let result = decode_heart_rate(&data);

    assert_eq!(result.heart_rate, 72);
    assert_eq!(result.rr_intervals, Some(vec![1000, 750]));
}

#[test]
fn test_rr_intervals_follow_energy_and_u16_value() {
    // Flags: 0x19 (16-bit HR + energy + RR)
    let data = [0x19, 0x48, 0x00, 0x0A, 0x00, 0x00, 0x04];
    let result = decode_heart_rate(&data);

    assert_eq!(result.heart_rate, 72);
    assert_eq!(result.energy_expended, Some(10));
    assert_eq!(result.rr_intervals, Some(vec![1000]));
}

#[test]
fn test_rr_trailing_odd_byte_ignored() {
    let data = [0x10, 0x48, 0x00, 0x04, 0x01];
    let result = decode_heart_rate(&data);

    assert_eq!(result.rr_intervals, Some(vec![1000]));
}

#[test]
fn test_rr_flag_without_values() {
    let result = decode_heart_rate(&[0x10, 0x48]);

    assert_eq!(result.rr_intervals, Some(vec![]));
}

#[test]
fn test_decode_too_short() {
    assert_eq!(decode_heart_rate(&[]).heart_rate, 0);
    assert_eq!(decode_heart_rate(&[0x00]).heart_rate, 0);
}

#[test]
fn test_decode_u16_missing_high_byte() {
    let result = decode_heart_rate(&[0x01, 0x48]);

    assert_eq!(result.heart_rate, 0);
}

#[test]
fn test_rr_interval_conversion() {
    assert_eq!(rr_interval_to_ms(0), 0);
    assert_eq!(rr_interval_to_ms(512), 500);
    assert_eq!(rr_interval_to_ms(1024), 1000);
    // 800/1024 s = 781.25 ms
    assert_eq!(rr_interval_to_ms(800), 781);
}

#[test]
fn test_varying_heart_rate_values() {
    for hr in [40u8, 60, 100, 145, 180, 220] {
        let result = decode_heart_rate(&[0x00, hr]);
        assert_eq!(result.heart_rate, hr as u16);
    }
}

#[test]
fn test_same_value_in_both_formats() {
    assert_eq!(decode_heart_rate(&[0x00, 80]).heart_rate, 80);
    assert_eq!(decode_heart_rate(&[0x01, 80, 0]).heart_rate, 80);
}

#[test]
fn test_truncated_energy_omitted() {
    // Flags: 0x08 (energy expended) but only one energy byte
    let result = decode_heart_rate(&[0x08, 0x64, 0xE8]);

    assert_eq!(result.heart_rate, 100);
    assert!(result.energy_expended.is_none());
    assert!(result.rr_intervals.is_none());
}

#[test]
fn test_truncated_energy_with_rr_flag() {
    // Flags: 0x18 (energy expended + RR), one trailing byte
    let result = decode_heart_rate(&[0x18, 0x64, 0xE8]);

    assert_eq!(result.heart_rate, 100);
    assert!(result.energy_expended.is_none());
    assert_eq!(result.rr_intervals, Some(vec![]));
}
