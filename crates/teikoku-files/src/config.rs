//! Staging configuration
//!
//! Values come from an optional TOML file layered under `TEIKOKU_*`
//! environment variables.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Settings for the staging service and its front end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StagingConfig {
    /// Log every record field change and stream open/close
    pub debug_logging: bool,
    /// Extensions (with leading dot) a picker should offer; empty means any
    pub extension_filter: Vec<String>,
    /// Cut the target file to the buffer length after a write-back
    pub truncate_on_write_back: bool,
}

impl StagingConfig {
    /// Checks that every filter entry looks like `.ext`
    pub fn validate(&self) -> Result<(), ConfigError> {
        for ext in &self.extension_filter {
            if !ext.starts_with('.') || ext.len() < 2 {
                return Err(ConfigError::Validation(format!(
                    "Extension filter entry must look like '.ext': {ext:?}"
                )));
            }
        }
        Ok(())
    }

    /// Whether `path` passes the extension filter
    pub fn accepts(&self, path: &Path) -> bool {
        if self.extension_filter.is_empty() {
            return true;
        }
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.extension_filter
            .iter()
            .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }
}

/// Loads [`StagingConfig`] from file and environment
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_path: PathBuf,
    env_prefix: String,
}

impl ConfigLoader {
    /// Loader for the default location `<config dir>/teikoku/config.toml`
    pub fn new() -> Self {
        Self::with_path(Self::default_config_path())
    }

    /// Loader for a custom file; the file may be absent
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            config_path: path,
            env_prefix: "TEIKOKU".to_string(),
        }
    }

    /// Overrides the environment variable prefix
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Path of the configuration file
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("teikoku")
            .join("config.toml")
    }

    /// Builds and validates the configuration
    pub fn load(&self) -> Result<StagingConfig, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(self.config_path.clone()).required(false))
            .add_source(
                Environment::with_prefix(&self.env_prefix)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("extension_filter"),
            )
            .build()?;

        let config: StagingConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Writes `config` as TOML to the loader's path
    pub fn save(&self, config: &StagingConfig) -> Result<(), ConfigError> {
        let toml = toml::to_string(config).map_err(|e| ConfigError::Parse(e.to_string()))?;
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.config_path, toml)?;
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
