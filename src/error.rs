//! CHRONOKV - Custom Error Types
//! Defines the validation errors raised at the store's call boundary.
//! A miss is never an error: reads return `Option`.

use std::time::Duration;

use thiserror::Error;

use crate::types::Timestamp;

/// Custom Result type for the chronokv store.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Error types for the chronokv store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The key is not acceptable (e.g. empty).
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// The key exceeds the configured maximum size.
    #[error("Key too large: {size} > {max} bytes")]
    KeyTooLarge { size: usize, max: usize },

    /// `timestamp + ttl` cannot be represented.
    #[error("TTL of {ttl:?} overflows the timestamp range at {timestamp}")]
    TtlOverflow { timestamp: Timestamp, ttl: Duration },

    /// A manual clock was asked to move backwards.
    #[error("Clock regression: cannot move from {current} back to {requested}")]
    ClockRegression {
        current: Timestamp,
        requested: Timestamp,
    },

    /// A manual clock advance ran past the end of the timestamp range.
    #[error("Clock overflow: advance exceeds the timestamp range")]
    ClockOverflow,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}
