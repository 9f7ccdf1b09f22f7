//! Configuration management for PickBox
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use pickbox::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Max file size: {}", config.picker.max_file_size);
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the
//! pattern `PICKBOX__<section>__<key>`:
//! - `PICKBOX__PICKER__MAX_FILE_SIZE=64MB`
//! - `PICKBOX__REMOTE__REQUEST_TIMEOUT_SECS=30`
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/pickbox.toml`.
//! This can be overridden using the `PICKBOX_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use crate::humanize::ByteSize;
pub use models::{Config, HandlerConfig, PickerLimits, RemoteConfig, SessionConfig};
pub use validation::ValidationError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables (`PICKBOX__*`)
    /// 2. TOML file (default: `config/pickbox.toml`)
    /// 3. Default values
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is malformed or
    /// validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    ///
    /// Useful for testing with custom configuration files.
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_valid_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("pickbox.toml");

        let toml_content = r#"
[picker]
max_file_size = "128MB"

[remote]
accept = ["image/*"]

[handlers.local]
enabled = true
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = Config::load_from_path(config_path).unwrap();
        assert_eq!(config.picker.max_file_size.as_u64(), 128 * 1024 * 1024);
        assert_eq!(config.remote.accept, vec!["image/*"]);
        assert_eq!(config.handlers.len(), 1);
    }

    #[test]
    fn test_load_rejects_invalid_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("pickbox.toml");

        let toml_content = r#"
[remote]
accept = ["image/"]
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let err = Config::load_from_path(config_path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }
}
