//! CHRONOKV - History Compaction
//! Maintenance passes that reclaim memory from version logs.
//!
//! ## Expired-key cleanup
//! Drops a key's whole log when its newest record is a value whose TTL has
//! elapsed. Tombstoned keys are kept so the deletion tracker stays consistent.
//!
//! ## Log compaction
//! Prunes records that are superseded and TTL-expired at `now`. Such records
//! can no longer answer any query at or after `now`. The newest record of a
//! key is never removed.

use std::fmt;

use dashmap::DashMap;

use crate::types::{Key, Timestamp};

use super::expiry::ExpiryPolicy;
use super::version_log::VersionLog;

/// Outcome of a maintenance pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompactionStats {
    /// Keys whose log was inspected.
    pub keys_scanned: usize,
    /// Individual records pruned from surviving logs.
    pub records_removed: usize,
    /// Keys whose log was dropped entirely.
    pub keys_dropped: usize,
}

impl fmt::Display for CompactionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "scanned {} keys, removed {} records, dropped {} keys",
            self.keys_scanned, self.records_removed, self.keys_dropped
        )
    }
}

/// Remove every key whose newest record expired by TTL at `now`.
pub fn drop_expired_keys<V>(
    logs: &DashMap<Key, VersionLog<V>>,
    now: Timestamp,
    policy: &ExpiryPolicy,
) -> CompactionStats {
    let mut stats = CompactionStats::default();
    logs.retain(|_key, log| {
        stats.keys_scanned += 1;
        let expired = log
            .latest()
            .map_or(true, |latest| {
                latest.timestamp() <= now && policy.is_expired(latest, now)
            });
        if expired {
            stats.keys_dropped += 1;
        }
        !expired
    });
    stats
}

/// Prune superseded, expired records from every log.
pub fn compact_logs<V>(
    logs: &DashMap<Key, VersionLog<V>>,
    now: Timestamp,
    policy: &ExpiryPolicy,
) -> CompactionStats {
    let mut stats = CompactionStats::default();
    for mut entry in logs.iter_mut() {
        stats.keys_scanned += 1;
        stats.records_removed += entry.value_mut().compact(now, policy);
    }
    stats
}
