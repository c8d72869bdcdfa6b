//! Image handling infrastructure.
//!
//! This module provides:
//! - Memory caching of resolved sources with LRU eviction
//! - An HTTP fetcher for candidate variants

pub mod http_fetcher;
pub mod memory_cache;

pub use http_fetcher::{HttpImageFetcher, sniff_format};
pub use memory_cache::{CacheStats, DEFAULT_CACHE_SIZE, MemoryImageCache};
