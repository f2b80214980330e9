//! CHRONOKV - Core Type Definitions
//! Defines fundamental types used across the store.

use std::fmt;
use std::time::Duration;

/// Key type for the store.
pub type Key = String;

/// A point in time, in microseconds since the Unix epoch.
///
/// Microseconds are the store's clock resolution: two operations landing in
/// the same microsecond share a timestamp and are ordered by insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The earliest representable timestamp.
    pub const ZERO: Timestamp = Timestamp(0);

    /// The latest representable timestamp.
    pub const MAX: Timestamp = Timestamp(u64::MAX);

    #[inline]
    pub const fn from_micros(micros: u64) -> Self {
        Self(micros)
    }

    #[inline]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis.saturating_mul(1_000))
    }

    #[inline]
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs.saturating_mul(1_000_000))
    }

    #[inline]
    pub const fn as_micros(&self) -> u64 {
        self.0
    }

    /// Adds a duration, returning `None` if the result is out of range.
    pub fn checked_add(&self, duration: Duration) -> Option<Timestamp> {
        let micros = u64::try_from(duration.as_micros()).ok()?;
        self.0.checked_add(micros).map(Timestamp)
    }

    /// Adds a duration, clamping at [`Timestamp::MAX`].
    pub fn saturating_add(&self, duration: Duration) -> Timestamp {
        self.checked_add(duration).unwrap_or(Timestamp::MAX)
    }

    /// Time elapsed since `earlier`, or zero if `earlier` is later than `self`.
    pub fn duration_since(&self, earlier: Timestamp) -> Duration {
        Duration::from_micros(self.0.saturating_sub(earlier.0))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single immutable version of a key.
/// A `None` value indicates a tombstone (deletion marker).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<V> {
    value: Option<V>,
    timestamp: Timestamp,
    ttl: Option<Duration>,
    /// Insertion order within the owning log; breaks timestamp ties.
    pub(crate) seq: u64,
}

impl<V> Record<V> {
    /// Create a record carrying a value (SET operation).
    pub fn put(value: V, timestamp: Timestamp, ttl: Option<Duration>) -> Self {
        Self {
            value: Some(value),
            timestamp,
            ttl,
            seq: 0,
        }
    }

    /// Create a tombstone record (DELETE operation).
    pub fn tombstone(timestamp: Timestamp) -> Self {
        Self {
            value: None,
            timestamp,
            ttl: None,
            seq: 0,
        }
    }

    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Returns true if this record is a tombstone.
    pub fn is_tombstone(&self) -> bool {
        self.value.is_none()
    }

    /// The instant after which this record stops being valid, if it has a TTL.
    pub fn expires_at(&self) -> Option<Timestamp> {
        self.ttl.map(|ttl| self.timestamp.saturating_add(ttl))
    }
}
