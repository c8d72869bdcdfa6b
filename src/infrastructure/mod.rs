//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// Image handling (source caching, HTTP fetching).
pub mod image;

pub use config::{
    AppConfig, CliArgs, ConfigError, ConfigStatus, LoadedConfig, LogLevel, StorageManager,
};
pub use image::{CacheStats, HttpImageFetcher, MemoryImageCache};
