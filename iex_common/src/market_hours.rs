//! Regular trading hours gate.
//!
//! `MarketHours` answers one question: is regular trading active at a given instant?
//! The instant is converted into the trading-calendar timezone first, then:
//!
//! - Saturday and Sunday (local calendar day) are always closed.
//! - Weekdays are open from 09:00:00 through 16:30:00 local time, both ends inclusive.
//!
//! The gate never reads the system clock; callers pass `now` in, which keeps it
//! deterministic under test. Exchange holidays are not modelled.

use chrono::{DateTime, Datelike, NaiveTime, TimeZone, Weekday};
use chrono_tz::Tz;

/// Timezone of the US equity trading calendar.
pub const TRADING_TIMEZONE: Tz = chrono_tz::America::New_York;

const OPEN: NaiveTime = match NaiveTime::from_hms_opt(9, 0, 0) {
    Some(time) => time,
    None => panic!("invalid market open time"),
};

const CLOSE: NaiveTime = match NaiveTime::from_hms_opt(16, 30, 0) {
    Some(time) => time,
    None => panic!("invalid market close time"),
};

/// Trading-hours window evaluated in a fixed timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketHours {
    tz: Tz,
    open: NaiveTime,
    close: NaiveTime,
}

impl MarketHours {
    /// Regular 09:00-16:30 session in the given timezone.
    pub fn new(tz: Tz) -> Self {
        Self {
            tz,
            open: OPEN,
            close: CLOSE,
        }
    }

    /// Timezone the window is evaluated in.
    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Returns `true` when `now` falls on a weekday inside the session window.
    pub fn is_open<T: TimeZone>(&self, now: &DateTime<T>) -> bool {
        let local = now.with_timezone(&self.tz);
        if matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
            return false;
        }
        let time = local.time();
        time >= self.open && time <= self.close
    }
}

impl Default for MarketHours {
    fn default() -> Self {
        Self::new(TRADING_TIMEZONE)
    }
}
