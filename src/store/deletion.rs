//! CHRONOKV - Deletion Tracker
//! O(1) membership for keys whose newest record is a tombstone.
//!
//! This only answers "is the key deleted now". Historical reads must inspect
//! the version log, because deletion status is itself time-dependent.

use dashmap::DashSet;

/// Concurrent set of explicitly deleted keys.
#[derive(Debug, Default)]
pub struct DeletionTracker {
    deleted: DashSet<String>,
}

impl DeletionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `key` was just tombstoned.
    pub fn mark_deleted(&self, key: &str) {
        self.deleted.insert(key.to_owned());
    }

    /// Clear the deleted flag after `key` is written again.
    pub fn unmark_deleted(&self, key: &str) {
        self.deleted.remove(key);
    }

    pub fn is_deleted(&self, key: &str) -> bool {
        self.deleted.contains(key)
    }

    /// Number of keys currently marked deleted.
    pub fn len(&self) -> usize {
        self.deleted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deleted.is_empty()
    }

    pub fn clear(&self) {
        self.deleted.clear();
    }
}
