pub mod classify;
pub mod config;
pub mod frame;
pub mod gate;
pub mod monitor;
pub mod notify;
pub mod snapshot;
pub mod telemetry;
pub mod transport;


pub use classify::{classify, AlertEvent, AlertKind, Severity};
pub use config::MonitorConfig;
pub use frame::{extract_frame, FRAME_PREFIX};
pub use gate::NotificationGate;
pub use monitor::{Monitor, SessionStats, TickOutcome};
pub use notify::{Notifier, NotifyError, NotifySendNotifier};
pub use snapshot::{PersistenceError, SnapshotPublisher, StatusSnapshot};
pub use telemetry::{decode, DecodeError, TelemetryRecord};
pub use transport::{LineSource, ReadOutcome, SerialLineSource, TransportError};
