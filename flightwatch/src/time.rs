//! Wall-clock access.
//!
//! Poll decisions depend on the local hour (active window) and on UTC
//! timestamps (estimated landing). Both come from a [`Clock`] so tests can
//! pin them.

use std::sync::Arc;

use chrono::{DateTime, Local, Timelike, Utc};
use parking_lot::Mutex;

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current instant in UTC.
    fn now_utc(&self) -> DateTime<Utc>;

    /// Current hour of day (0-23) in the process's local time zone.
    fn local_hour(&self) -> u32;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn local_hour(&self) -> u32 {
        Local::now().hour()
    }
}

/// A clock that only moves when told to.
///
/// The local hour is set independently of the UTC instant, so a test can
/// place "now" anywhere relative to the active window.
#[derive(Debug, Clone)]
pub struct ManualClock {
    inner: Arc<Mutex<ManualClockState>>,
}

#[derive(Debug)]
struct ManualClockState {
    now: DateTime<Utc>,
    local_hour: u32,
}

impl ManualClock {
    /// Create a clock pinned at `now` with the given local hour.
    pub fn new(now: DateTime<Utc>, local_hour: u32) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ManualClockState {
                now,
                local_hour: local_hour % 24,
            })),
        }
    }

    /// Pin the clock at the current system time and the given local hour.
    pub fn at_hour(local_hour: u32) -> Self {
        Self::new(Utc::now(), local_hour)
    }

    pub fn set_now(&self, now: DateTime<Utc>) {
        self.inner.lock().now = now;
    }

    pub fn set_local_hour(&self, local_hour: u32) {
        self.inner.lock().local_hour = local_hour % 24;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut state = self.inner.lock();
        state.now += by;
    }
}

impl Clock for ManualClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.inner.lock().now
    }

    fn local_hour(&self) -> u32 {
        self.inner.lock().local_hour
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_hour_in_range() {
        assert!(SystemClock.local_hour() < 24);
    }

    #[test]
    fn test_manual_clock_is_shared_between_clones() {
        let clock = ManualClock::at_hour(9);
        let other = clock.clone();
        let start = clock.now_utc();

        other.set_local_hour(3);
        other.advance(chrono::Duration::minutes(5));

        assert_eq!(clock.local_hour(), 3);
        assert_eq!(clock.now_utc() - start, chrono::Duration::minutes(5));
    }

    #[test]
    fn test_manual_clock_wraps_hour() {
        let clock = ManualClock::at_hour(25);
        assert_eq!(clock.local_hour(), 1);
    }
}
