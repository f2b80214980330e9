//! CHRONOKV - In-Memory Temporal Key-Value Store
//!
//! A single-node store that keeps the full version history of every key.
//!
//! ## Features
//! - **Version Log**: per-key, timestamp-ordered history with O(log n) point-in-time lookup
//! - **TTL Support**: per-write expiry, evaluated against the query time
//! - **Tombstones**: deletion is distinguishable from "never existed" and "expired"
//! - **Time Travel**: `get_at_time` reads any past (or future) instant
//! - **Injectable Clock**: system time in production, manual time in tests
//! - **Compaction**: prunes history that no current read can observe
//! - **Metrics**: Lock-free atomic counters for observability
//! - **Concurrency**: sharded locking, writers to different keys rarely contend
//!
//! ## Example
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use chronokv::clock::ManualClock;
//! use chronokv::store::Store;
//! use chronokv::types::Timestamp;
//!
//! let clock = Arc::new(ManualClock::new(Timestamp::ZERO));
//! let store: Store<i64> = Store::with_clock(clock.clone());
//!
//! store.set("x", 1, Some(Duration::from_secs(10))).unwrap();
//! clock.set(Timestamp::from_secs(20)).unwrap();
//!
//! assert_eq!(store.get("x"), None);
//! assert_eq!(store.get_at_time("x", Timestamp::from_secs(5)), Some(1));
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod store;
pub mod types;
