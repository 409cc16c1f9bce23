//! Coinvault Clock Infrastructure
//!
//! Time sources implementing the `Clock` port:
//!
//! - [`SystemClock`]: wall-clock time for production
//! - [`ManualClock`]: frozen time that only moves when told to, for tests
//!
//! ```ignore
//! use coinvault_clock::{Clock, ManualClock};
//! use chrono::Duration;
//!
//! let clock = ManualClock::epoch();
//! clock.advance(Duration::hours(24));
//! assert_eq!(clock.now().timestamp(), 86_400);
//! ```

mod manual;
mod system;

pub use manual::ManualClock;
pub use system::SystemClock;

// Re-export the Clock trait for convenience
pub use coinvault_ports::Clock;
