//! CHRONOKV - Clock Abstraction
//! Every TTL and history decision reads time through [`Clock`], so tests can
//! drive time by hand with [`ManualClock`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::{Result, StoreError};
use crate::types::Timestamp;

/// Source of "now" for the store.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> Timestamp;
}

/// Wall clock in microseconds since the Unix epoch.
///
/// Never returns a reading lower than one it already handed out, so a system
/// clock stepped backwards cannot reorder a key's history.
#[derive(Debug, Default)]
pub struct SystemClock {
    last: AtomicU64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }

    fn physical_micros() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros() as u64)
            .unwrap_or(0)
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let physical = Self::physical_micros();
        let previous = self.last.fetch_max(physical, Ordering::AcqRel);
        Timestamp::from_micros(physical.max(previous))
    }
}

/// Manually driven clock for deterministic tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    micros: AtomicU64,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    pub fn new(start: Timestamp) -> Self {
        Self {
            micros: AtomicU64::new(start.as_micros()),
        }
    }

    /// Move the clock forward by `by`.
    pub fn advance(&self, by: Duration) -> Result<Timestamp> {
        let delta = u64::try_from(by.as_micros()).map_err(|_| StoreError::ClockOverflow)?;
        let mut current = self.micros.load(Ordering::Acquire);
        loop {
            let next = current.checked_add(delta).ok_or(StoreError::ClockOverflow)?;
            match self.micros.compare_exchange_weak(
                current,
                next,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Ok(Timestamp::from_micros(next)),
                Err(observed) => current = observed,
            }
        }
    }

    /// Jump the clock to `to`. Moving backwards is rejected.
    pub fn set(&self, to: Timestamp) -> Result<()> {
        let mut current = self.micros.load(Ordering::Acquire);
        loop {
            if to.as_micros() < current {
                return Err(StoreError::ClockRegression {
                    current: Timestamp::from_micros(current),
                    requested: to,
                });
            }
            match self.micros.compare_exchange_weak(
                current,
                to.as_micros(),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Ok(()),
                Err(observed) => current = observed,
            }
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_micros(self.micros.load(Ordering::Acquire))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_monotonic() {
        let clock = SystemClock::new();
        let t1 = clock.now();
        let t2 = clock.now();
        assert!(t2 >= t1);
        assert!(t1 > Timestamp::ZERO);
    }

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::new(Timestamp::from_secs(5));
        assert_eq!(clock.now(), Timestamp::from_secs(5));

        let t = clock.advance(Duration::from_secs(3)).unwrap();
        assert_eq!(t, Timestamp::from_secs(8));
        assert_eq!(clock.now(), Timestamp::from_secs(8));
    }

    #[test]
    fn test_manual_clock_rejects_regression() {
        let clock = ManualClock::new(Timestamp::from_secs(10));
        let err = clock.set(Timestamp::from_secs(9)).unwrap_err();
        assert_eq!(
            err,
            StoreError::ClockRegression {
                current: Timestamp::from_secs(10),
                requested: Timestamp::from_secs(9),
            }
        );
        assert_eq!(clock.now(), Timestamp::from_secs(10));

        clock.set(Timestamp::from_secs(10)).unwrap();
        clock.set(Timestamp::from_secs(12)).unwrap();
        assert_eq!(clock.now(), Timestamp::from_secs(12));
    }

    #[test]
    fn test_manual_clock_overflow() {
        let clock = ManualClock::new(Timestamp::MAX);
        assert_eq!(
            clock.advance(Duration::from_micros(1)),
            Err(StoreError::ClockOverflow)
        );
        assert_eq!(clock.now(), Timestamp::MAX);
    }
}
