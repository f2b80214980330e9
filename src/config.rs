//! CHRONOKV - Store Configuration
//! Defines tunable parameters for the temporal store.

use crate::error::{Result, StoreError};

/// Default maximum key size in bytes.
pub const DEFAULT_MAX_KEY_SIZE: usize = 8 * 1024; // 8KB

/// Configuration for the chronokv store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Maximum accepted key length in bytes.
    pub max_key_size: usize,

    /// Whether `cleanup_expired` also compacts the histories it keeps.
    pub compact_on_cleanup: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_key_size: DEFAULT_MAX_KEY_SIZE,
            compact_on_cleanup: false,
        }
    }
}

impl StoreConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum key size.
    pub fn with_max_key_size(mut self, size: usize) -> Self {
        self.max_key_size = size;
        self
    }

    /// Make `cleanup_expired` compact surviving histories as well.
    pub fn with_compact_on_cleanup(mut self, enabled: bool) -> Self {
        self.compact_on_cleanup = enabled;
        self
    }

    /// Reject configurations the store cannot operate with.
    pub fn validate(&self) -> Result<()> {
        if self.max_key_size == 0 {
            return Err(StoreError::Config(
                "max_key_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.max_key_size, DEFAULT_MAX_KEY_SIZE);
        assert!(!config.compact_on_cleanup);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_chaining() {
        let config = StoreConfig::new()
            .with_max_key_size(64)
            .with_compact_on_cleanup(true);
        assert_eq!(config.max_key_size, 64);
        assert!(config.compact_on_cleanup);
    }

    #[test]
    fn test_zero_key_size_rejected() {
        let config = StoreConfig::new().with_max_key_size(0);
        assert!(matches!(config.validate(), Err(StoreError::Config(_))));
    }
}
