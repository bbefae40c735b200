use std::time::Instant;

use tracing::{error, info, trace, warn};

use crate::classify::classify;
use crate::config::MonitorConfig;
use crate::frame::extract_frame;
use crate::gate::NotificationGate;
use crate::notify::Notifier;
use crate::snapshot::SnapshotPublisher;
use crate::telemetry::{decode, TelemetryRecord};
use crate::transport::{LineSource, ReadOutcome, TransportError};

/// What one pipeline pass over the wire produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Read timed out; nothing arrived this tick.
    Idle,
    /// A line arrived but carried no frame.
    NoFrame,
    /// A frame arrived but its payload failed to decode.
    Skipped,
    /// A record was decoded, classified and published.
    Published { alerts_fired: usize },
}

#[derive(Debug, Clone, Default)]
pub struct SessionStats {
    pub lines_seen: u64,
    pub records_decoded: u64,
    pub decode_errors: u64,
    pub notifications_sent: u64,
}

/// The per-line pipeline: frame extraction, decode, classification, gated
/// notification, snapshot publication.
///
/// Only transport failures end the session; malformed payloads, notifier
/// failures and snapshot write failures are logged and recovered locally.
/// The notification gate's window and the last published snapshot are the
/// only state carried across lines.
pub struct Monitor<S: LineSource, N: Notifier> {
    source: S,
    notifier: N,
    publisher: SnapshotPublisher,
    gate: NotificationGate,
    config: MonitorConfig,
    stats: SessionStats,
    last_record: Option<TelemetryRecord>,
}

impl<S: LineSource, N: Notifier> Monitor<S, N> {
    pub fn new(
        source: S,
        notifier: N,
        publisher: SnapshotPublisher,
        config: MonitorConfig,
    ) -> Self {
        let gate = NotificationGate::new(config.notify_cooldown);
        Self {
            source,
            notifier,
            publisher,
            gate,
            config,
            stats: SessionStats::default(),
            last_record: None,
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn last_record(&self) -> Option<&TelemetryRecord> {
        self.last_record.as_ref()
    }

    /// Consumes one read from the source and drives it through the pipeline.
    pub async fn tick(&mut self) -> Result<TickOutcome, TransportError> {
        let outcome = self.source.read_line().await.map_err(|err| {
            error!(%err, "transport failure, ending session");
            err
        })?;

        let line = match outcome {
            ReadOutcome::Idle => return Ok(TickOutcome::Idle),
            ReadOutcome::Line(line) => line,
        };
        self.stats.lines_seen += 1;

        let Some(payload) = extract_frame(&line) else {
            trace!(line = %line, "no frame present");
            return Ok(TickOutcome::NoFrame);
        };

        let record = match decode(payload) {
            Ok(record) => record,
            Err(err) => {
                self.stats.decode_errors += 1;
                warn!(%err, "skipping malformed frame");
                return Ok(TickOutcome::Skipped);
            }
        };
        self.stats.records_decoded += 1;

        info!(
            capacity = record.capacity_percent,
            voltage_mv = record.voltage_mv,
            current_ma = record.current_ma,
            charging = record.is_charging,
            connected = record.is_connected,
            "telemetry"
        );

        let mut alerts_fired = 0;
        for event in classify(&record) {
            if !self.gate.admit(Instant::now()) {
                trace!(kind = ?event.kind, "notification suppressed by cooldown");
                continue;
            }
            match self
                .notifier
                .notify(event.title(), &event.message, event.severity)
                .await
            {
                Ok(()) => {
                    alerts_fired += 1;
                    self.stats.notifications_sent += 1;
                    info!(kind = ?event.kind, message = %event.message, "notification sent");
                }
                Err(err) => warn!(%err, "failed to send notification"),
            }
        }

        if let Err(err) = self.publisher.publish(&record) {
            warn!(%err, "failed to persist status snapshot");
        }
        self.last_record = Some(record);

        Ok(TickOutcome::Published { alerts_fired })
    }

    /// Releases the serial resource. The run loop calls this on every exit
    /// path, including after a fatal transport error.
    pub async fn shutdown(&mut self) -> Result<(), TransportError> {
        self.source.close().await
    }
}
