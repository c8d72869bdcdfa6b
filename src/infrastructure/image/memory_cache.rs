//! In-memory LRU cache of resolved image sources.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::domain::ports::ImageCachePort;

/// Default maximum number of cached sources for a gallery.
pub const DEFAULT_CACHE_SIZE: usize = 100;

/// Bounded LRU cache mapping canonical paths to the URL that loaded.
///
/// One instance is built at start-up and shared (via `Arc`) by every loader.
pub struct MemoryImageCache {
    cache: Mutex<LruCache<String, String>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryImageCache {
    /// Creates a new cache with the specified capacity (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(cap)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Creates a new cache with the default capacity.
    #[must_use]
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }

    /// Maximum number of entries.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.cache.lock().cap().get()
    }

    /// Returns cache statistics.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        CacheStats {
            hits,
            misses,
            hit_rate,
            size: self.len(),
        }
    }

    /// Reads an entry without promoting it.
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<String> {
        self.cache.lock().peek(key).cloned()
    }

    /// Keys from most to least recently used.
    #[must_use]
    pub fn keys_by_recency(&self) -> Vec<String> {
        self.cache.lock().iter().map(|(k, _)| k.clone()).collect()
    }
}

impl Default for MemoryImageCache {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

impl std::fmt::Debug for MemoryImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryImageCache")
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

/// Statistics about cache performance.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Hit rate as a percentage.
    pub hit_rate: f64,
    /// Current number of cached sources.
    pub size: usize,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cache: {} images, {:.1}% hit rate ({} hits, {} misses)",
            self.size, self.hit_rate, self.hits, self.misses
        )
    }
}

impl ImageCachePort for MemoryImageCache {
    fn get(&self, key: &str) -> Option<String> {
        let mut cache = self.cache.lock();
        if let Some(value) = cache.get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(key = %key, "Memory cache hit");
            Some(value.clone())
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            trace!(key = %key, "Memory cache miss");
            None
        }
    }

    fn set(&self, key: String, value: String) {
        let mut cache = self.cache.lock();
        if !cache.contains(&key)
            && cache.len() >= cache.cap().get()
            && let Some((evicted, _)) = cache.pop_lru()
        {
            debug!(key = %evicted, "Evicted least recently used source");
        }
        debug!(key = %key, value = %value, "Storing source in memory cache");
        cache.put(key, value);
    }

    fn has(&self, key: &str) -> bool {
        self.cache.lock().contains(key)
    }

    fn len(&self) -> usize {
        self.cache.lock().len()
    }

    fn clear(&self) {
        self.cache.lock().clear();
        debug!("Cleared memory image cache");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(cache: &MemoryImageCache, key: &str) {
        cache.set(key.to_string(), format!("{key}.avif"));
    }

    #[test]
    fn test_cache_set_and_get() {
        let cache = MemoryImageCache::new(10);
        cache.set("/a.jpg".to_string(), "/a.avif".to_string());

        assert_eq!(cache.get("/a.jpg").as_deref(), Some("/a.avif"));
    }

    #[test]
    fn test_cache_miss_returns_none() {
        let cache = MemoryImageCache::new(10);
        assert!(cache.get("/nonexistent.jpg").is_none());
        assert!(!cache.has("/nonexistent.jpg"));
    }

    #[test]
    fn test_cache_eviction() {
        let cache = MemoryImageCache::new(2);
        set(&cache, "a");
        set(&cache, "b");
        set(&cache, "c");

        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
        assert!(cache.get("c").is_some());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_get_promotes_entry() {
        let cache = MemoryImageCache::new(3);
        set(&cache, "a");
        set(&cache, "b");
        set(&cache, "c");

        // "a" becomes most recent, so "b" is now the victim
        let _ = cache.get("a");
        set(&cache, "d");

        assert!(cache.has("a"));
        assert!(!cache.has("b"));
        assert!(cache.has("c"));
        assert!(cache.has("d"));
    }

    #[test]
    fn test_has_does_not_promote() {
        let cache = MemoryImageCache::new(2);
        set(&cache, "a");
        set(&cache, "b");

        assert!(cache.has("a"));
        set(&cache, "c");

        assert!(!cache.has("a"));
    }

    #[test]
    fn test_overwrite_does_not_evict() {
        let cache = MemoryImageCache::new(2);
        set(&cache, "a");
        set(&cache, "b");
        cache.set("a".to_string(), "a.webp".to_string());

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.peek("a").as_deref(), Some("a.webp"));
        assert!(cache.has("b"));
    }

    #[test]
    fn test_size_never_exceeds_capacity() {
        let cache = MemoryImageCache::new(5);
        for i in 0..50 {
            set(&cache, &format!("img-{i}"));
            if i % 3 == 0 {
                let _ = cache.get(&format!("img-{}", i / 2));
            }
            assert!(cache.len() <= 5);
        }
        assert_eq!(cache.len(), 5);
    }

    #[test]
    fn test_untouched_entries_evicted_in_insertion_order() {
        let cache = MemoryImageCache::new(3);
        set(&cache, "a");
        set(&cache, "b");
        set(&cache, "c");

        set(&cache, "d");
        assert_eq!(cache.keys_by_recency(), vec!["d", "c", "b"]);

        set(&cache, "e");
        assert_eq!(cache.keys_by_recency(), vec!["e", "d", "c"]);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let cache = MemoryImageCache::new(0);
        assert_eq!(cache.capacity(), 1);
        set(&cache, "a");
        set(&cache, "b");
        assert_eq!(cache.len(), 1);
        assert!(cache.has("b"));
    }

    #[test]
    fn test_clear() {
        let cache = MemoryImageCache::default();
        set(&cache, "a");
        set(&cache, "b");
        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), DEFAULT_CACHE_SIZE);
    }

    #[test]
    fn test_cache_stats() {
        let cache = MemoryImageCache::new(10);
        set(&cache, "a");

        let _ = cache.get("a");
        let _ = cache.get("missing");

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 1);
        assert!((stats.hit_rate - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_peek_does_not_promote() {
        let cache = MemoryImageCache::new(2);
        set(&cache, "a");
        set(&cache, "b");

        let _ = cache.peek("a");
        set(&cache, "c");

        assert!(cache.peek("a").is_none());
    }
}
