//! CHRONOKV - Expiry Policy
//! Decides whether a record is readable at a given query time.
//!
//! A record is valid at `t` when it is not a tombstone and, if it carries a
//! TTL, `t <= timestamp + ttl`. A zero TTL expires immediately, even at the
//! creation instant.

use std::time::Duration;

use crate::types::{Record, Timestamp};

/// Stateless validity rules shared by every read path of the store.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpiryPolicy;

impl ExpiryPolicy {
    pub fn new() -> Self {
        Self
    }

    /// Returns true if `record` can be served at `query_time`.
    pub fn is_valid<V>(&self, record: &Record<V>, query_time: Timestamp) -> bool {
        !record.is_tombstone() && !self.is_expired(record, query_time)
    }

    /// Returns true if `record` holds a value whose TTL has elapsed at `query_time`.
    /// Tombstones are deleted, not expired.
    pub fn is_expired<V>(&self, record: &Record<V>, query_time: Timestamp) -> bool {
        if record.is_tombstone() {
            return false;
        }
        match record.ttl() {
            Some(ttl) if ttl.is_zero() => true,
            Some(ttl) => query_time > record.timestamp().saturating_add(ttl),
            None => false,
        }
    }

    /// Remaining lifetime of `record` as seen at `now`.
    /// Returns `None` if the record has no TTL, `Some(ZERO)` once it has expired.
    pub fn remaining_ttl<V>(&self, record: &Record<V>, now: Timestamp) -> Option<Duration> {
        record.ttl()?;
        if self.is_expired(record, now) {
            return Some(Duration::ZERO);
        }
        record.expires_at().map(|expires_at| expires_at.duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Timestamp {
        Timestamp::from_secs(s)
    }

    #[test]
    fn test_no_ttl_never_expires() {
        let policy = ExpiryPolicy::new();
        let rec = Record::put(1, secs(0), None);
        assert!(policy.is_valid(&rec, secs(0)));
        assert!(policy.is_valid(&rec, Timestamp::MAX));
        assert_eq!(policy.remaining_ttl(&rec, secs(100)), None);
    }

    #[test]
    fn test_ttl_boundary_is_inclusive() {
        let policy = ExpiryPolicy::new();
        let rec = Record::put(1, secs(0), Some(Duration::from_secs(10)));
        assert!(policy.is_valid(&rec, secs(5)));
        assert!(policy.is_valid(&rec, secs(10)));
        assert!(!policy.is_valid(&rec, secs(10).saturating_add(Duration::from_micros(1))));
        assert!(policy.is_expired(&rec, secs(11)));
    }

    #[test]
    fn test_tombstone_is_never_valid() {
        let policy = ExpiryPolicy::new();
        let rec: Record<i32> = Record::tombstone(secs(0));
        assert!(!policy.is_valid(&rec, secs(0)));
        assert!(!policy.is_expired(&rec, secs(100)));
        assert_eq!(policy.remaining_ttl(&rec, secs(0)), None);
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let policy = ExpiryPolicy::new();
        let rec = Record::put(1, secs(3), Some(Duration::ZERO));
        assert!(!policy.is_valid(&rec, secs(3)));
        assert!(policy.is_expired(&rec, secs(3)));
        assert_eq!(policy.remaining_ttl(&rec, secs(3)), Some(Duration::ZERO));
    }

    #[test]
    fn test_remaining_ttl() {
        let policy = ExpiryPolicy::new();
        let rec = Record::put(1, secs(0), Some(Duration::from_secs(10)));
        assert_eq!(
            policy.remaining_ttl(&rec, secs(4)),
            Some(Duration::from_secs(6))
        );
        assert_eq!(policy.remaining_ttl(&rec, secs(20)), Some(Duration::ZERO));
    }
}
