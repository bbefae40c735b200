use crate::telemetry::TelemetryRecord;

/// Discharge capacity at or below which the battery is critical.
pub const CRITICAL_CAPACITY: i64 = 10;
/// Discharge capacity at or below which (and above critical) the battery is low.
pub const LOW_CAPACITY: i64 = 15;
/// Charging capacity at or above which the battery counts as fully charged.
pub const FULL_CAPACITY: i64 = 95;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    CriticalBattery,
    LowBattery,
    FullyCharged,
    Disconnected,
}

/// Notification urgency, matching the levels notify-send accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Critical,
    Normal,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Normal => "normal",
            Severity::Low => "low",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AlertEvent {
    pub kind: AlertKind,
    pub severity: Severity,
    pub message: String,
}

impl AlertEvent {
    pub fn title(&self) -> &'static str {
        match self.kind {
            AlertKind::CriticalBattery => "Critical Battery",
            AlertKind::LowBattery => "Low Battery",
            AlertKind::FullyCharged => "Battery Charged",
            AlertKind::Disconnected => "UPS Disconnected",
        }
    }
}

/// Evaluates one record against the threshold rules and returns every alert
/// that applies, in rule order.
///
/// Pure: no clock, no memory of previous records. Repeat suppression is the
/// notification gate's job. Note the discharge band (15,20] intentionally
/// produces nothing.
pub fn classify(record: &TelemetryRecord) -> Vec<AlertEvent> {
    let mut events = Vec::new();

    if !record.is_charging {
        if record.capacity_percent <= CRITICAL_CAPACITY {
            events.push(AlertEvent {
                kind: AlertKind::CriticalBattery,
                severity: Severity::Critical,
                message: format!(
                    "UPS battery critically low: {}%",
                    record.capacity_percent
                ),
            });
        } else if record.capacity_percent <= LOW_CAPACITY {
            events.push(AlertEvent {
                kind: AlertKind::LowBattery,
                severity: Severity::Normal,
                message: format!("UPS battery low: {}%", record.capacity_percent),
            });
        }
    }

    if record.is_charging && record.capacity_percent >= FULL_CAPACITY {
        events.push(AlertEvent {
            kind: AlertKind::FullyCharged,
            severity: Severity::Low,
            message: format!(
                "UPS battery fully charged: {}%",
                record.capacity_percent
            ),
        });
    }

    if !record.is_connected {
        events.push(AlertEvent {
            kind: AlertKind::Disconnected,
            severity: Severity::Normal,
            message: "UPS module disconnected".to_string(),
        });
    }

    events
}
