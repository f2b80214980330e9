//! CHRONOKV - Store Metrics & Observability
//! Atomic counters tracking store operations in a lock-free,
//! thread-safe manner using `AtomicU64`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Atomic operation counters for the chronokv store.
///
/// All counters use `Ordering::Relaxed`; they are for observability only.
#[derive(Debug)]
pub struct StoreMetrics {
    /// Total number of `set` operations.
    pub sets: AtomicU64,
    /// Total number of current-time reads (`get`, `exists`).
    pub gets: AtomicU64,
    /// Total number of `get_at_time` reads.
    pub historical_gets: AtomicU64,
    /// Total number of `delete` calls that wrote a tombstone.
    pub deletes: AtomicU64,
    /// Reads that returned a value.
    pub hits: AtomicU64,
    /// Reads that returned nothing.
    pub misses: AtomicU64,
    /// Keys dropped by `cleanup_expired`.
    pub keys_expired: AtomicU64,
    /// Records pruned by compaction.
    pub records_compacted: AtomicU64,
    /// When the store was created.
    store_started: Instant,
}

impl StoreMetrics {
    /// Create a new metrics instance with all counters at zero.
    pub fn new() -> Self {
        Self {
            sets: AtomicU64::new(0),
            gets: AtomicU64::new(0),
            historical_gets: AtomicU64::new(0),
            deletes: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            keys_expired: AtomicU64::new(0),
            records_compacted: AtomicU64::new(0),
            store_started: Instant::now(),
        }
    }

    pub fn record_set(&self) {
        self.sets.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a current-time read and whether it hit.
    pub fn record_get(&self, hit: bool) {
        self.gets.fetch_add(1, Ordering::Relaxed);
        self.record_outcome(hit);
    }

    /// Record a point-in-time read and whether it hit.
    pub fn record_historical_get(&self, hit: bool) {
        self.historical_gets.fetch_add(1, Ordering::Relaxed);
        self.record_outcome(hit);
    }

    pub fn record_delete(&self) {
        self.deletes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_expired(&self, keys: usize) {
        self.keys_expired.fetch_add(keys as u64, Ordering::Relaxed);
    }

    pub fn record_compacted(&self, records: usize) {
        self.records_compacted
            .fetch_add(records as u64, Ordering::Relaxed);
    }

    fn record_outcome(&self, hit: bool) {
        if hit {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get store uptime in seconds.
    pub fn uptime_secs(&self) -> f64 {
        self.store_started.elapsed().as_secs_f64()
    }

    /// Total operations (sets + gets + historical gets + deletes).
    pub fn total_ops(&self) -> u64 {
        self.sets.load(Ordering::Relaxed)
            + self.gets.load(Ordering::Relaxed)
            + self.historical_gets.load(Ordering::Relaxed)
            + self.deletes.load(Ordering::Relaxed)
    }

    /// Get operations per second since the store was created.
    pub fn ops_per_sec(&self) -> f64 {
        let uptime = self.uptime_secs();
        if uptime < 0.001 {
            return 0.0;
        }
        self.total_ops() as f64 / uptime
    }

    /// Fraction of reads that returned a value, 0.0 when nothing was read.
    pub fn hit_ratio(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed);
        let total = hits + self.misses.load(Ordering::Relaxed);
        if total == 0 {
            return 0.0;
        }
        hits as f64 / total as f64
    }

    /// Format metrics as a human-readable report.
    pub fn report(&self) -> String {
        format!(
            "\n═══ CHRONOKV Store Metrics ═══\n\
             Operations:\n\
               sets:        {}\n\
               gets:        {}\n\
               gets (asof): {}\n\
               deletes:     {}\n\
             Reads:\n\
               hits:        {}\n\
               misses:      {}\n\
               hit ratio:   {:.2}\n\
             Throughput:\n\
               total ops:   {}\n\
               ops/sec:     {:.2}\n\
             Maintenance:\n\
               keys expired:      {}\n\
               records compacted: {}\n\
             Uptime: {:.2}s",
            self.sets.load(Ordering::Relaxed),
            self.gets.load(Ordering::Relaxed),
            self.historical_gets.load(Ordering::Relaxed),
            self.deletes.load(Ordering::Relaxed),
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
            self.hit_ratio(),
            self.total_ops(),
            self.ops_per_sec(),
            self.keys_expired.load(Ordering::Relaxed),
            self.records_compacted.load(Ordering::Relaxed),
            self.uptime_secs(),
        )
    }
}

impl Default for StoreMetrics {
    fn default() -> Self {
        Self::new()
    }
}
