//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/recap/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/recap/` (~/.config/recap/)
//! - State/Logs: `$XDG_STATE_HOME/recap/` (~/.local/state/recap/)

use crate::analytics::WrappedConfig;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Report limits
    #[serde(default)]
    pub wrapped: WrappedConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config
            .wrapped
            .validate()
            .map_err(|e| Error::Config(format!("invalid [wrapped] section: {}", e)))?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/recap/config.toml` (~/.config/recap/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("recap").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/recap/` (~/.local/state/recap/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("recap")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/recap/recap.log` (~/.local/state/recap/recap.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join(crate::logging::LOG_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.wrapped, WrappedConfig::default());
        assert_eq!(config.wrapped.rewatch_count, 10);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[wrapped]
top_movies_count = 5
series_count = 3

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.wrapped.top_movies_count, 5);
        assert_eq!(config.wrapped.series_count, 3);
        assert_eq!(config.wrapped.top_shows_count, 10);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.max_files, 5);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[wrapped]\ntop_genres_count = 7").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.wrapped.top_genres_count, 7);
    }

    #[test]
    fn test_load_rejects_zero_limit() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[wrapped]\nrewatch_count = 0").unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[wrapped\n").unwrap();
        assert!(Config::load_from(file.path()).is_err());
    }

    #[test]
    fn test_paths() {
        assert!(Config::config_path().ends_with("recap/config.toml"));
        assert!(Config::log_path().ends_with("recap/recap.log"));
    }
}
