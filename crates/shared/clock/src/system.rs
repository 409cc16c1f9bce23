use chrono::Utc;
use coinvault_core::Timestamp;
use coinvault_ports::Clock;

/// Wall-clock time; stamps refreshed records and reconciliation reports
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        SystemClock
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }

    fn name(&self) -> &str {
        "SystemClock"
    }
}
