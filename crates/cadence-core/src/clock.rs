//! Time sources for the session.
//!
//! The session never reads the system time directly; it asks an injected
//! [`Clock`]. Production code uses [`SystemClock`], tests drive a
//! [`ManualClock`] forward explicitly.

use std::sync::{Arc, Mutex};

use jiff::{SignedDuration, Timestamp};

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same instant, so a test can hand one clone to a session
/// and keep another to advance time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Timestamp>>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Move the clock forward (or backward for negative values).
    pub fn advance_secs(&self, secs: i64) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        if let Ok(next) = now.checked_add(SignedDuration::from_secs(secs)) {
            *now = next;
        }
    }

    pub fn set(&self, instant: Timestamp) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = instant;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Timestamp::UNIX_EPOCH)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Whole seconds elapsed from `earlier` to `later`, never negative.
pub fn elapsed_secs(earlier: Timestamp, later: Timestamp) -> u64 {
    u64::try_from(later.duration_since(earlier).as_secs()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_clones_share_time() {
        let clock = ManualClock::new(Timestamp::from_second(1_000).unwrap());
        let handle = clock.clone();
        handle.advance_secs(90);
        assert_eq!(clock.now(), Timestamp::from_second(1_090).unwrap());
    }

    #[test]
    fn test_elapsed_secs_clamps_negative() {
        let a = Timestamp::from_second(100).unwrap();
        let b = Timestamp::from_second(160).unwrap();
        assert_eq!(elapsed_secs(a, b), 60);
        assert_eq!(elapsed_secs(b, a), 0);
    }
}
