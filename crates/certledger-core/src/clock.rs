//! Time sources.
//!
//! Timestamps are Unix milliseconds. The engine reads time through [`Clock`]
//! so tests can pin block timestamps.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// A source of Unix millisecond timestamps.
pub trait Clock: Send + Sync {
    /// The current time in Unix milliseconds.
    fn now_millis(&self) -> i64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        // A clock set before the epoch reads as 0 rather than failing.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or_default()
    }
}

/// A clock that only moves when told to, optionally by a fixed step per read.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
    step: i64,
}

impl ManualClock {
    /// A clock frozen at `start`.
    pub fn new(start: i64) -> Self {
        Self {
            now: AtomicI64::new(start),
            step: 0,
        }
    }

    /// A clock that returns `start`, then advances by `step` after every read.
    pub fn ticking(start: i64, step: i64) -> Self {
        Self {
            now: AtomicI64::new(start),
            step,
        }
    }

    /// Move the clock to `millis`.
    pub fn set(&self, millis: i64) {
        self.now.store(millis, Ordering::SeqCst);
    }

    /// Advance the clock by `millis`.
    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.fetch_add(self.step, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_non_zero() {
        assert!(SystemClock.now_millis() > 0);
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(1000);
        assert_eq!(clock.now_millis(), 1000);
        assert_eq!(clock.now_millis(), 1000);

        clock.advance(5);
        assert_eq!(clock.now_millis(), 1005);

        clock.set(42);
        assert_eq!(clock.now_millis(), 42);
    }

    #[test]
    fn test_ticking_clock() {
        let clock = ManualClock::ticking(100, 10);
        assert_eq!(clock.now_millis(), 100);
        assert_eq!(clock.now_millis(), 110);
        assert_eq!(clock.now_millis(), 120);
    }
}
