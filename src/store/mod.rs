//! CHRONOKV - Temporal Store
//! Top-level module for the store and its components.
//!
//! Every write appends an immutable record to the key's [`VersionLog`].
//! Every read locates the newest record at or before the query time and
//! runs it through the [`ExpiryPolicy`].

pub mod compaction;
pub mod deletion;
pub mod expiry;
pub mod metrics;
pub mod version_log;

use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::clock::{Clock, SystemClock};
use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::types::{Key, Record, Timestamp};

use self::compaction::CompactionStats;
use self::deletion::DeletionTracker;
use self::expiry::ExpiryPolicy;
use self::metrics::StoreMetrics;
use self::version_log::VersionLog;

/// State of a key at a given query time, derived from its history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    /// Nothing was ever written at or before the query time.
    Absent,
    /// The newest record is a value that has not expired.
    Live,
    /// The newest record is a value whose TTL has elapsed.
    Expired,
    /// The newest record is a tombstone.
    Deleted,
}

struct StoreInner<V> {
    /// Key -> full version history. Sharded, so writers to different keys
    /// rarely contend.
    logs: DashMap<Key, VersionLog<V>>,
    deleted: DeletionTracker,
    policy: ExpiryPolicy,
    clock: Arc<dyn Clock>,
    config: StoreConfig,
    metrics: StoreMetrics,
}

/// Thread-safe, in-memory temporal key-value store.
///
/// Cloning is cheap and yields a handle to the same data.
///
/// ## Concurrency
/// An append holds the write lock of one map shard for a single binary
/// search and insert. Readers take the shard's read lock, so they never
/// observe a half-appended record. No operation holds locks on two keys.
///
/// ## Example
/// ```
/// use chronokv::store::Store;
/// use std::time::Duration;
///
/// let store: Store<String> = Store::new();
/// store.set("user:1", "ada".to_string(), None).unwrap();
/// store.set("session", "abc".to_string(), Some(Duration::from_secs(60))).unwrap();
///
/// assert_eq!(store.get("user:1"), Some("ada".to_string()));
/// assert!(store.delete("user:1"));
/// assert_eq!(store.get("user:1"), None);
/// ```
pub struct Store<V> {
    inner: Arc<StoreInner<V>>,
}

impl<V> Clone for Store<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> Store<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create a store on the system clock with default configuration.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock::new()))
    }

    /// Create a store reading time from `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::build(StoreConfig::default(), clock)
    }

    /// Create a store with a custom configuration and clock.
    pub fn with_config(config: StoreConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, clock))
    }

    fn build(config: StoreConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                logs: DashMap::new(),
                deleted: DeletionTracker::new(),
                policy: ExpiryPolicy::new(),
                clock,
                config,
                metrics: StoreMetrics::new(),
            }),
        }
    }

    /// Write a new version of `key`, optionally expiring `ttl` after now.
    ///
    /// Clears a previous deletion. Validation failures leave the store untouched.
    pub fn set(&self, key: &str, value: V, ttl: Option<Duration>) -> Result<()> {
        self.validate_key(key)?;

        let entry = self.inner.logs.entry(key.to_owned());
        let now = self.inner.clock.now();
        if let Some(ttl) = ttl {
            if now.checked_add(ttl).is_none() {
                return Err(StoreError::TtlOverflow {
                    timestamp: now,
                    ttl,
                });
            }
        }

        let mut log = match entry {
            Entry::Occupied(occupied) => occupied.into_ref(),
            Entry::Vacant(vacant) => vacant.insert(VersionLog::new()),
        };
        let seq = log.append(Record::put(value, now, ttl)).seq();
        self.inner.deleted.unmark_deleted(key);
        drop(log);

        self.inner.metrics.record_set();
        log::debug!("set {:?} at {} (seq {}, ttl {:?})", key, now, seq, ttl);
        Ok(())
    }

    /// The current value of `key`, or `None` if absent, expired or deleted.
    pub fn get(&self, key: &str) -> Option<V> {
        let value = if self.inner.deleted.is_deleted(key) {
            None
        } else {
            self.resolve(key, self.inner.clock.now())
        };
        self.inner.metrics.record_get(value.is_some());
        if value.is_none() {
            log::trace!("get miss for {:?}", key);
        }
        value
    }

    /// The value `key` held at `timestamp`, which may lie in the past or future.
    ///
    /// Resolved purely from the key's history; never mutates the store.
    pub fn get_at_time(&self, key: &str, timestamp: Timestamp) -> Option<V> {
        let value = self.resolve(key, timestamp);
        self.inner.metrics.record_historical_get(value.is_some());
        if value.is_none() {
            log::trace!("get_at_time miss for {:?} at {}", key, timestamp);
        }
        value
    }

    /// Tombstone a live key.
    ///
    /// Returns `false` without writing anything if the key is absent,
    /// expired or already deleted.
    pub fn delete(&self, key: &str) -> bool {
        if self.inner.deleted.is_deleted(key) {
            return false;
        }
        let Some(mut log) = self.inner.logs.get_mut(key) else {
            return false;
        };

        let now = self.inner.clock.now();
        let live = log
            .latest_at_or_before(now)
            .is_some_and(|record| self.inner.policy.is_valid(record, now));
        if !live {
            return false;
        }

        log.append(Record::tombstone(now));
        self.inner.deleted.mark_deleted(key);
        drop(log);

        self.inner.metrics.record_delete();
        log::debug!("delete {:?} at {} (tombstone written)", key, now);
        true
    }

    /// Returns true if `key` currently holds a readable value.
    pub fn exists(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of keys currently live.
    pub fn size(&self) -> usize {
        let now = self.inner.clock.now();
        self.inner
            .logs
            .iter()
            .filter(|entry| {
                entry
                    .value()
                    .latest_at_or_before(now)
                    .is_some_and(|record| self.inner.policy.is_valid(record, now))
            })
            .count()
    }

    /// Returns true if no key is currently live.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// State of `key` now.
    pub fn state(&self, key: &str) -> KeyState {
        self.state_at(key, self.inner.clock.now())
    }

    /// State of `key` at `timestamp`.
    pub fn state_at(&self, key: &str, timestamp: Timestamp) -> KeyState {
        let Some(log) = self.inner.logs.get(key) else {
            return KeyState::Absent;
        };
        match log.latest_at_or_before(timestamp) {
            None => KeyState::Absent,
            Some(record) if record.is_tombstone() => KeyState::Deleted,
            Some(record) if self.inner.policy.is_expired(record, timestamp) => KeyState::Expired,
            Some(_) => KeyState::Live,
        }
    }

    /// Remaining TTL of the live value of `key`.
    /// Returns `None` if the key is not live or its value never expires.
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let now = self.inner.clock.now();
        let log = self.inner.logs.get(key)?;
        let record = log.latest_at_or_before(now)?;
        if !self.inner.policy.is_valid(record, now) {
            return None;
        }
        self.inner.policy.remaining_ttl(record, now)
    }

    /// Every record written for `key`, oldest first.
    pub fn history(&self, key: &str) -> Vec<Record<V>> {
        self.inner
            .logs
            .get(key)
            .map(|log| log.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Records written for `key` with `from <= timestamp <= to`, oldest first.
    pub fn history_between(&self, key: &str, from: Timestamp, to: Timestamp) -> Vec<Record<V>> {
        self.inner
            .logs
            .get(key)
            .map(|log| log.records_between(from, to).to_vec())
            .unwrap_or_default()
    }

    /// Number of records held for `key`.
    pub fn version_count(&self, key: &str) -> usize {
        self.inner.logs.get(key).map_or(0, |log| log.len())
    }

    /// Drop all keys and history.
    pub fn clear(&self) {
        let keys = self.inner.logs.len();
        self.inner.logs.clear();
        self.inner.deleted.clear();
        log::info!("store cleared ({} keys dropped)", keys);
    }

    /// Drop the storage of every key whose newest value expired by TTL.
    ///
    /// Deleted keys are kept. With `compact_on_cleanup` set, surviving
    /// histories are compacted too. Returns the number of keys dropped.
    pub fn cleanup_expired(&self) -> usize {
        let now = self.inner.clock.now();
        let mut stats = compaction::drop_expired_keys(&self.inner.logs, now, &self.inner.policy);
        if self.inner.config.compact_on_cleanup {
            let pruned = compaction::compact_logs(&self.inner.logs, now, &self.inner.policy);
            stats.records_removed = pruned.records_removed;
            self.inner.metrics.record_compacted(pruned.records_removed);
        }
        self.inner.metrics.record_expired(stats.keys_dropped);
        log::info!("cleanup at {}: {}", now, stats);
        stats.keys_dropped
    }

    /// Prune superseded, expired records from every history.
    pub fn compact(&self) -> CompactionStats {
        let now = self.inner.clock.now();
        let stats = compaction::compact_logs(&self.inner.logs, now, &self.inner.policy);
        self.inner.metrics.record_compacted(stats.records_removed);
        log::info!("compaction at {}: {}", now, stats);
        stats
    }

    /// The injected clock's current reading.
    pub fn now(&self) -> Timestamp {
        self.inner.clock.now()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    pub fn metrics(&self) -> &StoreMetrics {
        &self.inner.metrics
    }

    fn resolve(&self, key: &str, t: Timestamp) -> Option<V> {
        let log = self.inner.logs.get(key)?;
        let record = log.latest_at_or_before(t)?;
        if self.inner.policy.is_valid(record, t) {
            record.value().cloned()
        } else {
            None
        }
    }

    fn validate_key(&self, key: &str) -> Result<()> {
        if key.is_empty() {
            return Err(StoreError::InvalidKey("key must not be empty".to_string()));
        }
        let max = self.inner.config.max_key_size;
        if key.len() > max {
            return Err(StoreError::KeyTooLarge {
                size: key.len(),
                max,
            });
        }
        Ok(())
    }
}

impl<V> Default for Store<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
