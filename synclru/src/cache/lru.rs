//! Thread-safe LRU cache
//!
//! One `parking_lot::Mutex` guards the index and the recency list together,
//! so every public call is a single critical section. Logging and statistics
//! happen after the guard is dropped.

use std::borrow::Borrow;
use std::hash::Hash;

use ahash::AHashMap;
use parking_lot::Mutex;

use super::list::{NodeRef, RecencyList};
use super::stats::CacheStats;
use crate::config::CacheConfig;
use crate::Result;

/// Upper bound on the entries reserved up front; larger caches grow on demand
const PREALLOC_LIMIT: usize = 1024;

/// Index and recency list, only ever touched under the cache lock
struct LruState<K, V> {
    index: AHashMap<K, NodeRef>,
    list: RecencyList<K, V>,
}

impl<K: Eq + Hash + Clone, V> LruState<K, V> {
    fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.min(PREALLOC_LIMIT);
        Self {
            index: AHashMap::with_capacity(capacity),
            list: RecencyList::with_capacity(capacity),
        }
    }

    /// Promote `key` and return its handle
    fn touch<Q>(&mut self, key: &Q) -> Option<NodeRef>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let node = *self.index.get(key)?;
        self.list.move_to_front(node);
        Some(node)
    }

    /// Drop the least recently touched entry
    fn evict(&mut self) -> bool {
        let Some(tail) = self.list.back() else {
            return false;
        };
        match self.list.remove(tail) {
            Some((key, _)) => {
                self.index.remove(&key);
                true
            }
            None => false,
        }
    }
}

/// Fixed-capacity LRU cache, safe to share between threads
///
/// ```
/// use synclru::LruCache;
///
/// let cache = LruCache::new(2).unwrap();
/// cache.set("a", 1);
/// cache.set("b", 2);
/// cache.get(&"a");
/// cache.set("c", 3); // evicts "b"
///
/// assert_eq!(cache.get(&"b"), None);
/// assert_eq!(cache.get(&"a"), Some(1));
/// ```
pub struct LruCache<K, V> {
    capacity: usize,
    state: Mutex<LruState<K, V>>,
    stats: CacheStats,
}

impl<K: Eq + Hash + Clone, V> LruCache<K, V> {
    /// Create a cache holding at most `capacity` entries
    ///
    /// Fails with [`LruError::InvalidCapacity`](crate::LruError::InvalidCapacity)
    /// if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_config(CacheConfig::new(capacity))
    }

    /// Create a cache from a [`CacheConfig`]
    pub fn with_config(config: CacheConfig) -> Result<Self> {
        if let Err(e) = config.validate() {
            log::error!("LruCache config error: {}", e);
            return Err(e);
        }

        log::debug!("LruCache created with capacity {}", config.capacity);
        Ok(Self {
            capacity: config.capacity,
            state: Mutex::new(LruState::with_capacity(config.capacity)),
            stats: CacheStats::new(),
        })
    }

    /// Insert or overwrite `key`, returning whether it was already cached.
    ///
    /// A new key evicts the least recently touched entry when the cache is
    /// full. Overwriting never evicts.
    pub fn set(&self, key: K, value: V) -> bool {
        let mut evicted = false;
        let existed = {
            let mut state = self.state.lock();

            if let Some(node) = state.touch(&key) {
                if let Some(slot) = state.list.get_mut(node) {
                    *slot = value;
                }
                true
            } else {
                if state.index.len() >= self.capacity {
                    evicted = state.evict();
                }
                let node = state.list.push_front(key.clone(), value);
                state.index.insert(key, node);
                false
            }
        };

        if existed {
            self.stats.record_update();
        } else {
            self.stats.record_insertion();
        }
        if evicted {
            self.stats.record_eviction();
            log::trace!("LruCache evicted 1 entry (capacity {})", self.capacity);
        }
        existed
    }

    /// Look up `key`, promoting it to most recently used on a hit
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.get_with(key, V::clone)
    }

    /// Like [`get`](Self::get), but maps the value under the lock instead of
    /// cloning it
    ///
    /// `f` runs while the cache lock is held and must not call back into this
    /// cache; doing so deadlocks.
    pub fn get_with<Q, R, F>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        F: FnOnce(&V) -> R,
    {
        let found = {
            let mut state = self.state.lock();
            match state.touch(key) {
                Some(node) => state.list.get(node).map(|(_, value)| f(value)),
                None => None,
            }
        };

        if found.is_some() {
            self.stats.record_hit();
        } else {
            self.stats.record_miss();
        }
        found
    }

    /// Read `key` without changing recency order or statistics
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        let state = self.state.lock();
        let node = *state.index.get(key)?;
        state.list.get(node).map(|(_, value)| value.clone())
    }

    /// Check if the cache contains a key, without promoting it
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.state.lock().index.contains_key(key)
    }

    /// Remove `key`, returning its value
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut state = self.state.lock();
        let node = state.index.remove(key)?;
        state.list.remove(node).map(|(_, value)| value)
    }

    /// Drop every entry
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.index.clear();
        state.list.clear();
    }

    /// Keys from most to least recently touched
    pub fn keys(&self) -> Vec<K> {
        let state = self.state.lock();
        state.list.iter().map(|(key, _)| key.clone()).collect()
    }

    /// Current number of entries
    pub fn len(&self) -> usize {
        self.state.lock().index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries, fixed at construction
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Hit/miss counters
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Verify index and list agree with each other and with the capacity.
    ///
    /// Walks the whole list, so this is O(n) under the lock.
    pub(crate) fn check_consistency(&self) -> bool {
        let state = self.state.lock();
        if !state.list.check_links() {
            return false;
        }
        if state.index.len() != state.list.len() || state.list.len() > self.capacity {
            return false;
        }
        state.index.iter().all(|(key, &node)| {
            matches!(state.list.get(node), Some((node_key, _)) if node_key == key)
        })
    }
}

impl<K, V> std::fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.capacity)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
