use super::*;
use crate::config::CacheConfig;
use crate::LruError;

use rand::Rng;
use std::sync::Arc;
use std::thread;

fn numbered(capacity: usize, count: usize) -> LruCache<String, usize> {
    let cache = LruCache::new(capacity).unwrap();
    for i in 0..count {
        cache.set(i.to_string(), i);
    }
    cache
}

#[test]
fn test_zero_capacity_rejected() {
    let err = LruCache::<String, i32>::new(0).unwrap_err();
    assert!(matches!(err, LruError::InvalidCapacity(0)));

    let err = LruCache::<String, i32>::with_config(CacheConfig::new(0)).unwrap_err();
    assert!(matches!(err, LruError::InvalidCapacity(0)));
}

#[test]
fn test_empty_cache() {
    let cache: LruCache<String, i32> = LruCache::new(10).unwrap();

    assert_eq!(cache.get("aaa"), None);
    assert_eq!(cache.get("bbb"), None);
    assert!(cache.is_empty());
    assert_eq!(cache.stats().misses(), 2);
    assert!(cache.check_consistency());
}

#[test]
fn test_simple() {
    let cache = LruCache::new(5).unwrap();

    assert!(!cache.set("aaa".to_string(), 100));
    assert!(!cache.set("bbb".to_string(), 200));

    assert_eq!(cache.get("aaa"), Some(100));
    assert_eq!(cache.get("bbb"), Some(200));

    assert!(cache.set("aaa".to_string(), 300));
    assert_eq!(cache.get("aaa"), Some(300));
    assert_eq!(cache.len(), 2);

    assert_eq!(cache.get("ccc"), None);
}

#[test]
fn test_lru_eviction() {
    let cache = LruCache::new(2).unwrap();

    cache.set("a", 1);
    cache.set("b", 2);

    // Access "a" to make it recently used
    cache.get(&"a");

    // Add "c", should evict "b"
    cache.set("c", 3);

    assert_eq!(cache.get(&"a"), Some(1));
    assert_eq!(cache.get(&"b"), None);
    assert_eq!(cache.get(&"c"), Some(3));
}

#[test]
fn test_update_does_not_grow_or_evict() {
    let cache = LruCache::new(2).unwrap();

    cache.set("a", 1);
    cache.set("b", 2);
    assert!(cache.set("a", 10));
    assert!(cache.set("b", 20));

    assert_eq!(cache.len(), 2);
    assert_eq!(cache.stats().evictions(), 0);
    assert_eq!(cache.get(&"a"), Some(10));
    assert_eq!(cache.get(&"b"), Some(20));
}

#[test]
fn test_update_promotes() {
    let cache = LruCache::new(2).unwrap();

    cache.set("a", 1);
    cache.set("b", 2);
    cache.set("a", 3);
    cache.set("c", 4);

    assert!(cache.contains(&"a"));
    assert!(!cache.contains(&"b"));
    assert_eq!(cache.keys(), vec!["c", "a"]);
}

#[test]
fn test_fill_to_capacity_never_evicts() {
    for capacity in 1..=8 {
        let cache = numbered(capacity, capacity);
        assert_eq!(cache.len(), capacity);
        assert_eq!(cache.stats().evictions(), 0);

        // One more evicts exactly the oldest
        cache.set(capacity.to_string(), capacity);
        assert_eq!(cache.len(), capacity);
        assert_eq!(cache.stats().evictions(), 1);
        assert!(!cache.contains("0"));
        for i in 1..=capacity {
            assert!(cache.contains(i.to_string().as_str()));
        }
        assert!(cache.check_consistency());
    }
}

#[test]
fn test_purge_logic_capacity() {
    let cache = numbered(5, 10);

    for i in 5..10 {
        assert_eq!(cache.get(i.to_string().as_str()), Some(i));
    }
    for i in 0..5 {
        assert_eq!(cache.get(i.to_string().as_str()), None);
    }
    assert_eq!(cache.stats().evictions(), 5);
}

#[test]
fn test_purge_logic_not_used() {
    let cache = numbered(3, 3);

    assert_eq!(cache.get("2"), Some(2));
    assert_eq!(cache.get("1"), Some(1));

    assert!(!cache.set("3".to_string(), 3));

    assert_eq!(cache.get("0"), None);
    assert_eq!(cache.get("1"), Some(1));
    assert_eq!(cache.get("2"), Some(2));
    assert_eq!(cache.get("3"), Some(3));
}

#[test]
fn test_get_promotes_over_older_entries() {
    let cache = LruCache::new(3).unwrap();

    cache.set('A', 1);
    cache.set('B', 2);
    cache.set('C', 3);
    cache.get(&'A');
    cache.set('D', 4);

    assert!(cache.contains(&'A'));
    assert!(!cache.contains(&'B'));
    assert_eq!(cache.keys(), vec!['D', 'A', 'C']);
}

#[test]
fn test_repeated_get_is_idempotent() {
    let cache = numbered(4, 4);

    cache.get("1");
    let after_first = cache.keys();
    cache.get("1");
    assert_eq!(cache.keys(), after_first);
    assert_eq!(cache.len(), 4);
}

#[test]
fn test_miss_has_no_side_effects() {
    let cache = numbered(3, 3);
    let before = cache.keys();

    assert_eq!(cache.get("missing"), None);
    assert_eq!(cache.keys(), before);
    assert_eq!(cache.stats().evictions(), 0);
}

#[test]
fn test_peek_and_contains_do_not_promote() {
    let cache = numbered(2, 2);

    assert_eq!(cache.peek("0"), Some(0));
    assert!(cache.contains("0"));
    assert_eq!(cache.stats().hits(), 0);

    cache.set("2".to_string(), 2);
    assert!(!cache.contains("0"));
}

#[test]
fn test_get_with_non_clone_value() {
    struct Blob(Vec<u8>);

    let cache = LruCache::new(2).unwrap();
    cache.set(1u32, Blob(vec![1, 2, 3]));

    assert_eq!(cache.get_with(&1, |blob| blob.0.len()), Some(3));
    assert_eq!(cache.get_with(&2, |blob| blob.0.len()), None);
}

#[test]
fn test_remove() {
    let cache = numbered(3, 3);

    assert_eq!(cache.remove("1"), Some(1));
    assert_eq!(cache.remove("1"), None);
    assert_eq!(cache.len(), 2);
    assert!(cache.check_consistency());

    // Freed room is reused without eviction
    cache.set("3".to_string(), 3);
    assert_eq!(cache.stats().evictions(), 0);
    assert_eq!(cache.keys(), vec!["3", "2", "0"]);
}

#[test]
fn test_clear() {
    let cache = numbered(3, 3);

    cache.clear();
    assert!(cache.is_empty());
    for i in 0..3 {
        assert_eq!(cache.get(i.to_string().as_str()), None);
    }
    assert!(cache.check_consistency());

    // Usable again at full capacity
    for i in 10..13 {
        assert!(!cache.set(i.to_string(), i));
    }
    assert_eq!(cache.len(), 3);
    assert_eq!(cache.stats().evictions(), 0);
    assert_eq!(cache.capacity(), 3);
}

#[test]
fn test_huge_capacity_builds_lazily() {
    let cache = LruCache::<String, u32>::new(usize::MAX).unwrap();
    assert_eq!(cache.capacity(), usize::MAX);

    for i in 0..3u32 {
        assert!(!cache.set(i.to_string(), i));
    }
    assert_eq!(cache.get("1"), Some(1));
    assert_eq!(cache.len(), 3);
    assert_eq!(cache.stats().evictions(), 0);
    assert!(cache.check_consistency());
}

#[test]
fn test_capacity_one() {
    let cache = LruCache::new(1).unwrap();

    assert!(!cache.set("a", 1));
    assert!(!cache.set("b", 2));
    assert_eq!(cache.get(&"a"), None);
    assert_eq!(cache.get(&"b"), Some(2));
    assert!(cache.set("b", 3));
    assert_eq!(cache.len(), 1);
    assert!(cache.check_consistency());
}

#[test]
fn test_concurrent_set_and_get() {
    let cache = Arc::new(LruCache::new(10).unwrap());

    let writer = {
        let cache = Arc::clone(&cache);
        thread::spawn(move || {
            for i in 0..30_000usize {
                cache.set(i.to_string(), i);
            }
        })
    };

    let reader = {
        let cache = Arc::clone(&cache);
        thread::spawn(move || {
            let mut rng = rand::thread_rng();
            for _ in 0..30_000 {
                let key = rng.gen_range(0..30_000usize).to_string();
                if let Some(value) = cache.get(key.as_str()) {
                    assert_eq!(value.to_string(), key);
                }
            }
        })
    };

    writer.join().unwrap();
    reader.join().unwrap();

    assert_eq!(cache.len(), 10);
    assert!(cache.check_consistency());
    for i in 29_990..30_000usize {
        assert!(cache.contains(i.to_string().as_str()));
    }
}

#[test]
fn test_concurrent_mixed_workload_stays_consistent() {
    let cache = Arc::new(LruCache::new(16).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                let mut rng = rand::thread_rng();
                for i in 0..5_000u32 {
                    let key = rng.gen_range(0..64u32);
                    match rng.gen_range(0..10) {
                        0..=4 => {
                            cache.set(key, (t, i));
                        }
                        5..=8 => {
                            cache.get(&key);
                        }
                        _ => {
                            if t == 0 && i % 1_000 == 0 {
                                cache.clear();
                            } else {
                                cache.remove(&key);
                            }
                        }
                    }
                    assert!(cache.len() <= cache.capacity());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(cache.len() <= 16);
    assert!(cache.check_consistency());
}
