//! Hit/miss statistics
//!
//! Lock-free counters updated after each cache operation, outside the cache
//! lock. Counters are individually exact but only eventually consistent with
//! each other while operations are in flight.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Aligned counter to avoid false sharing between atomic counters
#[repr(align(64))]
struct AlignedCounter(AtomicU64);

impl AlignedCounter {
    fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    #[inline]
    fn incr(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn load(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    #[inline]
    fn reset(&self) {
        self.0.store(0, Ordering::Relaxed);
    }
}

/// Cache operation counters
pub struct CacheStats {
    /// `get` calls that found the key
    hits: AlignedCounter,
    /// `get` calls that missed
    misses: AlignedCounter,
    /// `set` calls that added a new key
    insertions: AlignedCounter,
    /// `set` calls that overwrote an existing key
    updates: AlignedCounter,
    /// Entries dropped to make room for a new key
    evictions: AlignedCounter,
}

impl CacheStats {
    pub fn new() -> Self {
        Self {
            hits: AlignedCounter::new(),
            misses: AlignedCounter::new(),
            insertions: AlignedCounter::new(),
            updates: AlignedCounter::new(),
            evictions: AlignedCounter::new(),
        }
    }

    #[inline]
    pub fn record_hit(&self) {
        self.hits.incr();
    }

    #[inline]
    pub fn record_miss(&self) {
        self.misses.incr();
    }

    #[inline]
    pub fn record_insertion(&self) {
        self.insertions.incr();
    }

    #[inline]
    pub fn record_update(&self) {
        self.updates.incr();
    }

    #[inline]
    pub fn record_eviction(&self) {
        self.evictions.incr();
    }

    pub fn hits(&self) -> u64 {
        self.hits.load()
    }

    pub fn misses(&self) -> u64 {
        self.misses.load()
    }

    pub fn evictions(&self) -> u64 {
        self.evictions.load()
    }

    /// Hit rate as a percentage (0-100). An untouched cache reports 0.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load();
        let total = hits + self.misses.load();
        if total == 0 {
            0.0
        } else {
            (hits as f64 / total as f64) * 100.0
        }
    }

    /// Reset all counters
    pub fn reset(&self) {
        self.hits.reset();
        self.misses.reset();
        self.insertions.reset();
        self.updates.reset();
        self.evictions.reset();
    }

    /// Take a snapshot of current counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits.load(),
            misses: self.misses.load(),
            insertions: self.insertions.load(),
            updates: self.updates.load(),
            evictions: self.evictions.load(),
            hit_rate: self.hit_rate(),
        }
    }
}

impl Default for CacheStats {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.snapshot(), f)
    }
}

/// Point-in-time copy of [`CacheStats`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub insertions: u64,
    pub updates: u64,
    pub evictions: u64,
    pub hit_rate: f64,
}

impl StatsSnapshot {
    /// Format snapshot as human-readable string
    pub fn format(&self) -> String {
        format!(
            "CacheStats {{\n\
            \tget: {} hits, {} misses ({:.1}% hit rate)\n\
            \tset: {} insertions, {} updates\n\
            \tevictions: {}\n\
            }}",
            self.hits,
            self.misses,
            self.hit_rate,
            self.insertions,
            self.updates,
            self.evictions,
        )
    }
}
