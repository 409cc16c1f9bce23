use chrono::{DateTime, Duration, Utc};
use coinvault_core::Timestamp;
use coinvault_ports::Clock;
use parking_lot::RwLock;
use std::sync::Arc;

/// Clock frozen at a given instant until explicitly moved
///
/// Clones share the same underlying time, so a test can keep a handle and
/// advance the clock seen by the code under test.
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: Arc<RwLock<Timestamp>>,
}

impl ManualClock {
    /// Create a clock frozen at `time`
    pub fn at(time: DateTime<Utc>) -> Self {
        Self {
            current: Arc::new(RwLock::new(time)),
        }
    }

    /// Create a clock frozen at the Unix epoch
    pub fn epoch() -> Self {
        Self::at(DateTime::<Utc>::default())
    }

    /// Move time forward by `duration`
    pub fn advance(&self, duration: Duration) {
        let mut current = self.current.write();
        *current += duration;
    }

    /// Jump to a specific instant
    pub fn set(&self, time: Timestamp) {
        *self.current.write() = time;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.current.read()
    }

    fn name(&self) -> &str {
        "ManualClock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_manual_clock_is_frozen() {
        let clock = ManualClock::epoch();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now().timestamp(), 0);
    }

    #[test]
    fn test_advance_is_shared_between_clones() {
        let clock = ManualClock::epoch();
        let handle = clock.clone();

        handle.advance(Duration::hours(24));

        assert_eq!(clock.now().timestamp(), 86_400);
    }

    #[test]
    fn test_set_jumps_to_instant() {
        let clock = ManualClock::epoch();
        let target = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();

        clock.set(target);

        assert_eq!(clock.now(), target);
    }
}
