//! LRU cache
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  LruCache                                    │
//! │  - capacity (fixed at construction)          │
//! │  - Mutex ─► index: key → NodeRef             │
//! │           └ list:  RecencyList (MRU … LRU)   │
//! ├──────────────────────────────────────────────┤
//! │  CacheStats (atomics, outside the lock)      │
//! └──────────────────────────────────────────────┘
//! ```

pub mod list;
pub mod lru;
pub mod stats;

#[cfg(test)]
mod tests;

pub use list::{NodeRef, RecencyList};
pub use lru::LruCache;
pub use stats::{CacheStats, StatsSnapshot};
