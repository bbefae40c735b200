use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::telemetry::TelemetryRecord;

/// External-facing projection of the latest telemetry record. Fully
/// overwritten on every successful decode; no history is kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub capacity_percent: i64,
    pub is_charging: bool,
    #[serde(rename = "voltage_mV")]
    pub voltage_mv: u64,
    #[serde(rename = "current_mA")]
    pub current_ma: i64,
    pub timestamp: DateTime<Utc>,
    pub status: String,
}

impl StatusSnapshot {
    pub fn from_record(record: &TelemetryRecord) -> Self {
        Self {
            capacity_percent: record.capacity_percent,
            is_charging: record.is_charging,
            voltage_mv: record.voltage_mv,
            current_ma: record.current_ma,
            timestamp: record.received_at,
            status: if record.is_charging {
                "charging".to_string()
            } else {
                "discharging".to_string()
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to write snapshot {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Writes the latest snapshot to a fixed path via temp file + rename, so a
/// concurrent reader never observes a partially written document.
#[derive(Debug, Clone)]
pub struct SnapshotPublisher {
    path: PathBuf,
}

impl SnapshotPublisher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    pub fn publish(&self, record: &TelemetryRecord) -> Result<(), PersistenceError> {
        let snapshot = StatusSnapshot::from_record(record);
        let body = serde_json::to_vec_pretty(&snapshot)?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &body).map_err(|source| PersistenceError::Write {
            path: tmp.display().to_string(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| PersistenceError::Write {
            path: self.path.display().to_string(),
            source,
        })?;

        Ok(())
    }
}
