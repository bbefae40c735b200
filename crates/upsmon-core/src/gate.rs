use std::time::{Duration, Instant};

/// Default minimum spacing between two admitted notifications.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(300);

/// Rate limiter for user notifications.
///
/// One gate per monitoring session, shared by every alert kind: an admitted
/// critical-battery notification also holds back a disconnected notification
/// for the rest of the window. The caller supplies `now` so tests can drive
/// the gate with a synthetic clock.
#[derive(Debug)]
pub struct NotificationGate {
    cooldown: Duration,
    last_allowed: Option<Instant>,
}

impl NotificationGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_allowed: None,
        }
    }

    /// Returns true iff a notification may fire at `now`, recording the
    /// admission. State changes only on a true outcome.
    pub fn admit(&mut self, now: Instant) -> bool {
        let allowed = match self.last_allowed {
            None => true,
            Some(last) => now.duration_since(last) >= self.cooldown,
        };

        if allowed {
            self.last_allowed = Some(now);
        }
        allowed
    }
}

impl Default for NotificationGate {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_admission_always_passes() {
        let mut gate = NotificationGate::default();
        assert!(gate.admit(Instant::now()));
    }

    #[test]
    fn window_is_closed_until_the_cooldown_elapses() {
        let mut gate = NotificationGate::new(Duration::from_secs(300));
        let t0 = Instant::now();

        assert!(gate.admit(t0));
        assert!(!gate.admit(t0 + Duration::from_secs(299)));
        assert!(gate.admit(t0 + Duration::from_secs(300)));
    }

    #[test]
    fn rejected_calls_do_not_extend_the_window() {
        let mut gate = NotificationGate::new(Duration::from_secs(300));
        let t0 = Instant::now();

        assert!(gate.admit(t0));
        // Hammering the gate must not push the reopen time out.
        for s in 1..300 {
            assert!(!gate.admit(t0 + Duration::from_secs(s)));
        }
        assert!(gate.admit(t0 + Duration::from_secs(300)));
    }

    #[test]
    fn back_to_back_admissions_within_one_pass_are_suppressed() {
        let mut gate = NotificationGate::new(Duration::from_secs(300));
        let t0 = Instant::now();

        assert!(gate.admit(t0));
        assert!(!gate.admit(t0));
    }
}
