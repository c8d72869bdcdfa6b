//! Port definition for the resolved-source cache.

/// Key/value cache mapping a canonical path to the URL that loaded for it.
///
/// All operations are synchronous and must not suspend. Implementations
/// must be thread-safe so one instance can be shared by every loader.
pub trait ImageCachePort: Send + Sync {
    /// Returns the cached value and marks the entry most recently used.
    fn get(&self, key: &str) -> Option<String>;

    /// Inserts or overwrites an entry, evicting the least recently used
    /// entry first when a new key would exceed capacity.
    fn set(&self, key: String, value: String);

    /// Returns true if the key is cached. Does not affect recency.
    fn has(&self, key: &str) -> bool;

    /// Returns the current number of entries.
    fn len(&self) -> usize;

    /// Returns true if the cache is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every entry.
    fn clear(&self);
}
