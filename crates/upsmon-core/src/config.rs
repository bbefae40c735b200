use std::time::Duration;

use crate::gate::DEFAULT_COOLDOWN;

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Upper bound on one blocking serial read.
    pub read_timeout: Duration,
    /// How long the run loop waits after a tick that produced no frame.
    pub idle_backoff: Duration,
    /// Minimum spacing between two admitted notifications, all kinds pooled.
    pub notify_cooldown: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            read_timeout: Duration::from_secs(1),
            idle_backoff: Duration::from_secs(1),
            notify_cooldown: DEFAULT_COOLDOWN,
        }
    }
}
