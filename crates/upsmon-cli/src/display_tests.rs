use chrono::Utc;
use upsmon_core::TelemetryRecord;

use crate::display::{format_current, format_record, format_temperature, format_voltage};

fn record() -> TelemetryRecord {
    TelemetryRecord {
        capacity_percent: 87,
        is_charging: true,
        is_connected: true,
        voltage_mv: 12450,
        current_ma: 320,
        temperature_celsius: Some(31),
        consecutive_failures: 0,
        last_update_ms: 918273,
        received_at: Utc::now(),
    }
}

#[test]
fn voltage_renders_in_volts_or_na() {
    assert_eq!(format_voltage(12450), "12.45V");
    assert_eq!(format_voltage(11800), "11.80V");
    assert_eq!(format_voltage(0), "N/A");
}

#[test]
fn current_is_signed_except_zero() {
    assert_eq!(format_current(320), "+320mA");
    assert_eq!(format_current(-450), "-450mA");
    assert_eq!(format_current(0), "0mA");
}

#[test]
fn temperature_handles_absence() {
    assert_eq!(format_temperature(Some(31)), "31°C");
    assert_eq!(format_temperature(None), "N/A");
}

#[test]
fn non_positive_temperature_renders_na() {
    assert_eq!(format_temperature(Some(0)), "N/A");
    assert_eq!(format_temperature(Some(-3)), "N/A");
}

#[test]
fn record_rendering_covers_the_status_line() {
    let text = format_record(&record());

    assert!(text.contains("Battery: 87%"));
    assert!(text.contains("12.45V"));
    assert!(text.contains("+320mA"));
    assert!(text.contains("31°C"));
    assert!(text.contains("Charging"));
    assert!(text.contains("Connected"));
    assert!(!text.contains("failures"), "no failure suffix when count is 0");
    assert!(
        text.contains("Device clock: 918273ms"),
        "device counter is shown raw, not as a host-clock age"
    );
}

#[test]
fn failure_count_shows_only_when_nonzero() {
    let mut failing = record();
    failing.consecutive_failures = 3;
    failing.is_charging = false;
    failing.is_connected = false;

    let text = format_record(&failing);
    assert!(text.contains("(3 failures)"));
    assert!(text.contains("Discharging"));
    assert!(text.contains("Disconnected"));
}
