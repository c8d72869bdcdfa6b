//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use crate::application::services::ImageLoaderConfig;
use crate::domain::ports::ObserveOptions;
use crate::domain::services::DEFAULT_FORMATS;
use crate::infrastructure::image::DEFAULT_CACHE_SIZE;

pub(crate) const APP_NAME: &str = "gallery-loader";
pub(crate) const APP_QUALIFIER: &str = "com";
pub(crate) const APP_ORGANIZATION: &str = "linuxmobile";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log file path. Logs go to stderr when unset.
    #[serde(default)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Loader configuration.
    #[serde(default)]
    pub loader: LoaderSection,

    /// Visibility scheduling configuration.
    ///
    /// Read by embedders that drive a `VisibilityScheduler`; the CLI
    /// binary loads every path eagerly and ignores it.
    #[serde(default)]
    pub scheduler: SchedulerSection,

    /// HTTP fetcher configuration.
    #[serde(default)]
    pub http: HttpSection,
}

/// Accepted range for `[loader].attempt_timeout_ms`.
pub const ATTEMPT_TIMEOUT_RANGE_MS: std::ops::RangeInclusive<u64> = 100..=120_000;

/// `[loader]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderSection {
    /// Per-candidate timeout in milliseconds.
    #[serde(default = "default_attempt_timeout_ms")]
    pub attempt_timeout_ms: u64,

    /// Maximum cached sources.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

impl Default for LoaderSection {
    fn default() -> Self {
        Self {
            attempt_timeout_ms: default_attempt_timeout_ms(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

/// `[scheduler]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerSection {
    /// Start loading this many pixels before the slot enters the viewport.
    #[serde(default = "default_root_margin_px")]
    pub root_margin_px: u32,

    /// Visible fraction that counts as visible.
    #[serde(default = "default_threshold")]
    pub threshold: f32,
}

impl Default for SchedulerSection {
    fn default() -> Self {
        Self {
            root_margin_px: default_root_margin_px(),
            threshold: default_threshold(),
        }
    }
}

/// `[http]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSection {
    /// Base URL relative paths are resolved against.
    #[serde(default)]
    pub base_url: Option<String>,

    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            base_url: None,
            user_agent: default_user_agent(),
        }
    }
}

const fn default_attempt_timeout_ms() -> u64 {
    8_000
}

const fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_SIZE
}

const fn default_root_margin_px() -> u32 {
    200
}

const fn default_threshold() -> f32 {
    0.1
}

fn default_user_agent() -> String {
    format!("{APP_NAME}/{}", env!("CARGO_PKG_VERSION"))
}

use super::args::CliArgs;

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(timeout) = args.timeout_ms {
            self.loader.attempt_timeout_ms = timeout;
        }
        if let Some(capacity) = args.cache_capacity {
            self.loader.cache_capacity = capacity;
        }
        if let Some(base_url) = &args.base_url {
            self.http.base_url = Some(base_url.clone());
        }
    }

    /// Loader settings derived from `[loader]`.
    ///
    /// An attempt timeout outside [`ATTEMPT_TIMEOUT_RANGE_MS`] is clamped.
    #[must_use]
    pub fn loader_config(&self) -> ImageLoaderConfig {
        let requested = self.loader.attempt_timeout_ms;
        let timeout_ms = requested.clamp(
            *ATTEMPT_TIMEOUT_RANGE_MS.start(),
            *ATTEMPT_TIMEOUT_RANGE_MS.end(),
        );
        if timeout_ms != requested {
            warn!(requested, used = timeout_ms, "Attempt timeout out of range, clamping");
        }

        ImageLoaderConfig {
            attempt_timeout: Duration::from_millis(timeout_ms),
            formats: DEFAULT_FORMATS.to_vec(),
        }
    }

    /// Observation options derived from `[scheduler]`, threshold clamped to `0..=1`.
    #[must_use]
    pub fn observe_options(&self) -> ObserveOptions {
        ObserveOptions {
            root_margin_px: self.scheduler.root_margin_px,
            threshold: self.scheduler.threshold.clamp(0.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
            log_level = "debug"

            [loader]
            attempt_timeout_ms = 10000

            [http]
            base_url = "https://photos.example.com"
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.loader.attempt_timeout_ms, 10_000);
        assert_eq!(config.loader.cache_capacity, 100);
        assert_eq!(config.scheduler.root_margin_px, 200);
        assert_eq!(
            config.http.base_url.as_deref(),
            Some("https://photos.example.com")
        );
        assert!(config.http.user_agent.starts_with("gallery-loader/"));
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.loader_config().attempt_timeout, Duration::from_secs(8));
        assert_eq!(config.observe_options(), ObserveOptions::default());
    }

    #[test]
    fn test_args_override_file_values() {
        let mut config = AppConfig::default();
        let args = CliArgs::parse_from([
            "gallery-loader",
            "--timeout-ms",
            "9000",
            "--cache-capacity",
            "5",
            "--base-url",
            "http://localhost:5173",
            "/a.jpg",
        ]);

        config.merge_with_args(&args);

        assert_eq!(config.loader.attempt_timeout_ms, 9000);
        assert_eq!(config.loader.cache_capacity, 5);
        assert_eq!(config.http.base_url.as_deref(), Some("http://localhost:5173"));
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_zero_timeout_is_clamped() {
        let mut config = AppConfig::default();
        config.loader.attempt_timeout_ms = 0;
        assert_eq!(
            config.loader_config().attempt_timeout,
            Duration::from_millis(100)
        );

        config.loader.attempt_timeout_ms = u64::MAX;
        assert_eq!(
            config.loader_config().attempt_timeout,
            Duration::from_secs(120)
        );
    }

    #[test]
    fn test_threshold_is_clamped() {
        let mut config = AppConfig::default();
        config.scheduler.threshold = 3.5;
        assert!((config.observe_options().threshold - 1.0).abs() < f32::EPSILON);
    }
}
