//! Wall-clock source used by the refresh loop for gating and timing.
use chrono::{DateTime, Utc};

/// Supplies the current instant. Injected so tests can pin or script time.
pub trait Clock: Send + Sync {
    /// Current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
