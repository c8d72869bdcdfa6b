//! Application configuration.

pub mod app_config;
pub mod args;
pub mod storage;

pub use app_config::{
    ATTEMPT_TIMEOUT_RANGE_MS, AppConfig, HttpSection, LoaderSection, LogLevel, SchedulerSection,
};
pub use args::CliArgs;
pub use storage::{ConfigError, ConfigStatus, LoadedConfig, StorageManager};
