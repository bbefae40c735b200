use std::io::{self, Write};

use anyhow::Result;
use chrono::Local;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use upsmon_core::TelemetryRecord;

pub fn format_voltage(millivolts: u64) -> String {
    if millivolts == 0 {
        return "N/A".to_string();
    }
    format!("{:.2}V", millivolts as f64 / 1000.0)
}

pub fn format_current(milliamps: i64) -> String {
    if milliamps == 0 {
        return "0mA".to_string();
    }
    format!("{milliamps:+}mA")
}

pub fn format_temperature(celsius: Option<i64>) -> String {
    // The sensor reports 0 when it has no reading; non-positive values are
    // not displayable temperatures.
    match celsius {
        Some(t) if t > 0 => format!("{t}\u{00b0}C"),
        _ => "N/A".to_string(),
    }
}

/// Multi-line human rendering of one record.
pub fn format_record(record: &TelemetryRecord) -> String {
    let charging = if record.is_charging {
        "Charging"
    } else {
        "Discharging"
    };
    let connected = if record.is_connected {
        "Connected"
    } else {
        "Disconnected"
    };
    let failures = if record.consecutive_failures > 0 {
        format!(" ({} failures)", record.consecutive_failures)
    } else {
        String::new()
    };

    format!(
        "Battery: {}% | {} | {} | {}\n{} | {}{}\nDevice clock: {}ms | Received: {}\n",
        record.capacity_percent,
        format_voltage(record.voltage_mv),
        format_current(record.current_ma),
        format_temperature(record.temperature_celsius),
        charging,
        connected,
        failures,
        record.last_update_ms,
        record.received_at.to_rfc3339(),
    )
}

/// Clear-screen refresh for the watch view.
pub fn render_watch(record: &TelemetryRecord) -> Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;

    writeln!(
        stdout,
        "UPS Battery Monitor - {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(stdout, "{}", "-".repeat(60))?;
    write!(stdout, "{}", format_record(record))?;
    writeln!(stdout, "{}", "-".repeat(60))?;
    writeln!(stdout, "Press Ctrl+C to stop")?;
    stdout.flush()?;

    Ok(())
}
