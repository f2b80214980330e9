//! CHRONOKV - Version Log
//! The per-key history: every record ever written for a key, sorted by
//! `(timestamp, seq)`. Point-in-time lookups are a binary search for the
//! rightmost record at or before the query time.

use std::slice::Iter;

use crate::types::{Record, Timestamp};

use super::expiry::ExpiryPolicy;

/// Append-only, timestamp-ordered history of one key.
#[derive(Debug, Clone)]
pub struct VersionLog<V> {
    /// Records sorted ascending by `(timestamp, seq)`.
    records: Vec<Record<V>>,
    /// Sequence number handed to the next appended record.
    next_seq: u64,
}

impl<V> VersionLog<V> {
    /// Create a new, empty log.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_seq: 0,
        }
    }

    /// Returns the number of records held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the log holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a record, stamping it with the next insertion sequence.
    ///
    /// The record lands after every record with `timestamp <=` its own, so a
    /// record sharing a timestamp with earlier ones becomes the newest of them.
    /// Existing records are never reordered.
    pub fn append(&mut self, mut record: Record<V>) -> &Record<V> {
        record.seq = self.next_seq;
        self.next_seq += 1;

        let idx = self.upper_bound(record.timestamp());
        self.records.insert(idx, record);
        &self.records[idx]
    }

    /// The newest record with `timestamp <= query_time`.
    pub fn latest_at_or_before(&self, query_time: Timestamp) -> Option<&Record<V>> {
        match self.upper_bound(query_time) {
            0 => None,
            idx => Some(&self.records[idx - 1]),
        }
    }

    /// The newest record overall.
    pub fn latest(&self) -> Option<&Record<V>> {
        self.records.last()
    }

    /// Records with `from <= timestamp <= to`, oldest first.
    pub fn records_between(&self, from: Timestamp, to: Timestamp) -> &[Record<V>] {
        if from > to {
            return &[];
        }
        let start = self.records.partition_point(|r| r.timestamp() < from);
        let end = self.upper_bound(to);
        &self.records[start..end]
    }

    /// Iterate over all records, oldest first.
    pub fn iter(&self) -> Iter<'_, Record<V>> {
        self.records.iter()
    }

    /// Drop records that are both superseded and TTL-expired at `now`.
    ///
    /// A record is superseded when a later record with `timestamp <= now`
    /// exists. The newest record is always kept. Returns the number removed.
    pub fn compact(&mut self, now: Timestamp, policy: &ExpiryPolicy) -> usize {
        let visible = self.upper_bound(now);
        if visible < 2 {
            return 0;
        }
        let before = self.records.len();
        let mut idx = 0;
        self.records.retain(|record| {
            let superseded = idx + 1 < visible;
            idx += 1;
            !(superseded && policy.is_expired(record, now))
        });
        before - self.records.len()
    }

    /// Index of the first record with `timestamp > t`.
    fn upper_bound(&self, t: Timestamp) -> usize {
        self.records.partition_point(|r| r.timestamp() <= t)
    }
}

impl<V> Default for VersionLog<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn secs(s: u64) -> Timestamp {
        Timestamp::from_secs(s)
    }

    #[test]
    fn test_empty_log() {
        let log: VersionLog<&str> = VersionLog::new();
        assert!(log.is_empty());
        assert!(log.latest().is_none());
        assert!(log.latest_at_or_before(Timestamp::MAX).is_none());
    }

    #[test]
    fn test_point_in_time_lookup() {
        let mut log = VersionLog::new();
        log.append(Record::put("a", secs(1), None));
        log.append(Record::put("b", secs(5), None));
        log.append(Record::put("c", secs(9), None));

        assert!(log.latest_at_or_before(secs(0)).is_none());
        assert_eq!(log.latest_at_or_before(secs(1)).unwrap().value(), Some(&"a"));
        assert_eq!(log.latest_at_or_before(secs(4)).unwrap().value(), Some(&"a"));
        assert_eq!(log.latest_at_or_before(secs(5)).unwrap().value(), Some(&"b"));
        assert_eq!(log.latest_at_or_before(secs(100)).unwrap().value(), Some(&"c"));
        assert_eq!(log.latest().unwrap().value(), Some(&"c"));
    }

    #[test]
    fn test_equal_timestamps_later_append_wins() {
        let mut log = VersionLog::new();
        log.append(Record::put("first", secs(3), None));
        log.append(Record::put("second", secs(3), None));
        log.append(Record::tombstone(secs(3)));
        log.append(Record::put("third", secs(3), None));

        let latest = log.latest_at_or_before(secs(3)).unwrap();
        assert_eq!(latest.value(), Some(&"third"));
        assert_eq!(latest.seq(), 3);

        let seqs: Vec<u64> = log.iter().map(|r| r.seq()).collect();
        assert_eq!(seqs, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_out_of_order_append_keeps_sorted() {
        let mut log = VersionLog::new();
        log.append(Record::put("late", secs(10), None));
        log.append(Record::put("early", secs(2), None));

        let stamps: Vec<Timestamp> = log.iter().map(|r| r.timestamp()).collect();
        assert_eq!(stamps, vec![secs(2), secs(10)]);
        assert_eq!(log.latest_at_or_before(secs(5)).unwrap().value(), Some(&"early"));
    }

    #[test]
    fn test_records_between() {
        let mut log = VersionLog::new();
        for s in [1, 3, 5, 7] {
            log.append(Record::put(s, secs(s), None));
        }
        let values: Vec<u64> = log
            .records_between(secs(3), secs(6))
            .iter()
            .filter_map(|r| r.value().copied())
            .collect();
        assert_eq!(values, vec![3, 5]);
        assert!(log.records_between(secs(6), secs(3)).is_empty());
    }

    #[test]
    fn test_compact_removes_superseded_expired() {
        let policy = ExpiryPolicy::new();
        let mut log = VersionLog::new();
        log.append(Record::put("old", secs(0), Some(Duration::from_secs(1))));
        log.append(Record::put("keep", secs(2), None));
        log.append(Record::put("short", secs(3), Some(Duration::from_secs(1))));
        log.append(Record::put("newest", secs(10), Some(Duration::from_secs(1))));

        let removed = log.compact(secs(20), &policy);
        assert_eq!(removed, 2);
        let values: Vec<&str> = log.iter().filter_map(|r| r.value().copied()).collect();
        assert_eq!(values, vec!["keep", "newest"]);
    }

    #[test]
    fn test_compact_never_removes_latest() {
        let policy = ExpiryPolicy::new();
        let mut log = VersionLog::new();
        log.append(Record::put("only", secs(0), Some(Duration::from_secs(1))));
        assert_eq!(log.compact(secs(50), &policy), 0);
        assert_eq!(log.len(), 1);
    }
}
