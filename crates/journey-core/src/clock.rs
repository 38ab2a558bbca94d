//! Wall-clock port, used to timestamp failure reports.

use chrono::{DateTime, Utc};

/// Source of the current time. Tests inject a frozen clock so reports are
/// reproducible.
pub trait Clock: Send + Sync {
    /// The current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the host's system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
