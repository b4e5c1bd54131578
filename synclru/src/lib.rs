//! synclru
//!
//! A fixed-capacity, thread-safe least-recently-used cache.
//! Every read or write promotes an entry to most recent; inserting a new key
//! into a full cache evicts the least recently touched one.

pub mod cache;
pub mod config;

// Re-export main types
pub use cache::{CacheStats, LruCache, NodeRef, RecencyList, StatsSnapshot};
pub use config::CacheConfig;

/// Cache error type
#[derive(Debug, thiserror::Error)]
pub enum LruError {
    #[error("Invalid capacity: {0} (must be at least 1)")]
    InvalidCapacity(usize),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LruError>;
