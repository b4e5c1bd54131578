//! Cache configuration

use serde::{Deserialize, Serialize};

use crate::{LruError, Result};

/// Environment variable read by [`CacheConfig::from_env`]
pub const CAPACITY_ENV: &str = "SYNCLRU_CAPACITY";

/// Capacity used when none is configured
pub const DEFAULT_CAPACITY: usize = 128;

/// Construction-time cache settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of entries; must be at least 1
    pub capacity: usize,
}

impl CacheConfig {
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Reject a zero capacity
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(LruError::InvalidCapacity(self.capacity));
        }
        Ok(())
    }

    /// Build from `SYNCLRU_CAPACITY`, falling back to the default when unset
    pub fn from_env() -> Result<Self> {
        match std::env::var(CAPACITY_ENV) {
            Ok(raw) => Self::parse_capacity(&raw),
            Err(std::env::VarError::NotPresent) => Ok(Self::default()),
            Err(e) => Err(LruError::Config(format!("{}: {}", CAPACITY_ENV, e))),
        }
    }

    fn parse_capacity(raw: &str) -> Result<Self> {
        let capacity = raw.trim().parse::<usize>().map_err(|e| {
            LruError::Config(format!("{}={:?}: {}", CAPACITY_ENV, raw, e))
        })?;
        let config = Self { capacity };
        config.validate()?;
        Ok(config)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = CacheConfig::default();
        assert_eq!(config.capacity, DEFAULT_CAPACITY);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = CacheConfig::new(0).validate().unwrap_err();
        assert!(matches!(err, LruError::InvalidCapacity(0)));
    }

    #[test]
    fn test_parse_capacity() {
        assert_eq!(CacheConfig::parse_capacity(" 42 ").unwrap().capacity, 42);
        assert!(matches!(
            CacheConfig::parse_capacity("0"),
            Err(LruError::InvalidCapacity(0))
        ));
        assert!(matches!(
            CacheConfig::parse_capacity("-3"),
            Err(LruError::Config(_))
        ));
        assert!(matches!(
            CacheConfig::parse_capacity("lots"),
            Err(LruError::Config(_))
        ));
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_string(&CacheConfig::new(7)).unwrap();
        assert_eq!(json, r#"{"capacity":7}"#);

        let config: CacheConfig = serde_json::from_str(r#"{"capacity":9}"#).unwrap();
        assert_eq!(config, CacheConfig::new(9));
    }
}
