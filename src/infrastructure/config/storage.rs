use super::app_config::{APP_NAME, APP_ORGANIZATION, APP_QUALIFIER, AppConfig};
use directories::ProjectDirs;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to determine config directory")]
    ConfigDirNotFound,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// How the configuration file was turned into an [`AppConfig`].
#[derive(Debug)]
pub enum ConfigStatus {
    /// Parsed from an existing file.
    Parsed,
    /// No file existed, so defaults were written to it.
    Created,
    /// The file exists but is not valid; defaults are in use.
    Malformed(toml::de::Error),
}

/// A configuration together with where it came from.
///
/// Loading happens before logging is installed, so the outcome is carried
/// as a value and reported later through [`LoadedConfig::report`].
#[derive(Debug)]
pub struct LoadedConfig {
    /// Effective configuration.
    pub config: AppConfig,
    /// File the configuration was read from or written to.
    pub path: PathBuf,
    /// What happened while loading.
    pub status: ConfigStatus,
}

impl LoadedConfig {
    /// Logs the load outcome.
    pub fn report(&self) {
        match &self.status {
            ConfigStatus::Parsed => info!(path = %self.path.display(), "Loaded configuration"),
            ConfigStatus::Created => {
                info!(path = %self.path.display(), "Config file not found, wrote defaults");
            }
            ConfigStatus::Malformed(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to parse config file, using defaults"
            ),
        }
    }
}

/// Locates and reads the gallery-loader configuration file.
pub struct StorageManager {
    config_dir: PathBuf,
}

impl StorageManager {
    /// Uses the platform configuration directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration directory cannot be determined.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or(ConfigError::ConfigDirNotFound)?;

        Ok(Self { config_dir })
    }

    /// Uses `path` as the configuration directory.
    #[must_use]
    pub fn with_dir(path: PathBuf) -> Self {
        Self { config_dir: path }
    }

    /// Default configuration file inside the configuration directory.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    /// Loads the configuration, writing defaults if the file is missing.
    ///
    /// A malformed file is not an error: defaults are used and the parse
    /// failure is kept in [`ConfigStatus::Malformed`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or written.
    pub fn load_config(&self, path_override: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
        let path = path_override.map_or_else(|| self.config_path(), Path::to_path_buf);

        if !path.exists() {
            let config = AppConfig::default();
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            Self::save_to_file(&path, &config)?;
            return Ok(LoadedConfig {
                config,
                path,
                status: ConfigStatus::Created,
            });
        }

        let content = fs::read_to_string(&path)?;
        let (config, status) = match toml::from_str::<AppConfig>(&content) {
            Ok(config) => (config, ConfigStatus::Parsed),
            Err(e) => (AppConfig::default(), ConfigStatus::Malformed(e)),
        };

        Ok(LoadedConfig {
            config,
            path,
            status,
        })
    }

    fn save_to_file(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(config)?;

        let parent = path
            .parent()
            .ok_or_else(|| std::io::Error::other("Invalid path"))?;
        let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.persist(path).map_err(|e| e.error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_writes_defaults() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path().join("nested"));

        let loaded = manager.load_config(None).unwrap();

        assert!(matches!(loaded.status, ConfigStatus::Created));
        assert_eq!(loaded.config.loader.cache_capacity, 100);
        assert_eq!(loaded.path, manager.config_path());
        assert!(manager.config_path().exists());

        let again = manager.load_config(None).unwrap();
        assert!(matches!(again.status, ConfigStatus::Parsed));
        assert_eq!(again.config.loader.attempt_timeout_ms, 8000);
    }

    #[test]
    fn test_malformed_file_falls_back_and_keeps_error() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path().to_path_buf());
        fs::write(manager.config_path(), "loader = [not toml").unwrap();

        let loaded = manager.load_config(None).unwrap();

        assert!(matches!(loaded.status, ConfigStatus::Malformed(_)));
        assert_eq!(loaded.config.loader.attempt_timeout_ms, 8000);
        assert_eq!(
            fs::read_to_string(manager.config_path()).unwrap(),
            "loader = [not toml"
        );
    }

    #[test]
    fn test_path_override() {
        let dir = tempdir().unwrap();
        let manager = StorageManager::with_dir(dir.path().to_path_buf());
        let custom = dir.path().join("custom.toml");
        fs::write(&custom, "[scheduler]\nroot_margin_px = 100\n").unwrap();

        let loaded = manager.load_config(Some(&custom)).unwrap();

        assert!(matches!(loaded.status, ConfigStatus::Parsed));
        assert_eq!(loaded.config.scheduler.root_margin_px, 100);
        assert_eq!(loaded.path, custom);
        assert!(!manager.config_path().exists());
    }
}
