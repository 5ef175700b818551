//! Configuration management for sandboxed-fs
//!
//! Loads the allowed root directories and default directory modes from a TOML file
//! with environment overrides.

use config::{Config, Environment, File, FileFormat};
use log::{debug, info};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::info::mode::parse_octal_mode;
use crate::sandbox::Sandbox;
use crate::storage::CreateOptions;

/// Locations tried when no explicit config file is given
pub const DEFAULT_CONFIG_PATHS: [&str; 2] = [
    "sandboxed-fs/config", // Packaged install: ./sandboxed-fs/config.toml
    "config",              // Local development: ./config.toml
];

/// Environment prefix for overrides, e.g. `SANDBOXED_FS__ALLOWED_DIRECTORIES=/data,/srv`
pub const ENV_PREFIX: &str = "SANDBOXED_FS";

fn default_mode() -> String {
    "0777".to_string()
}

/// Filesystem layer configuration
#[derive(Debug, Deserialize, Clone)]
pub struct FsConfig {
    /// Roots every path must lie under
    #[serde(default)]
    pub allowed_directories: Vec<String>,

    /// Skip confinement entirely; paths are still normalized
    #[serde(default)]
    pub unrestricted: bool,

    /// Octal mode for directories created on request
    #[serde(default = "default_mode")]
    pub directory_mode: String,

    /// Octal mode for parent directories created along the way
    #[serde(default = "default_mode")]
    pub parent_directory_mode: String,
}

impl FsConfig {
    /// Load configuration from config.toml with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let mut last_error = None;

        for config_path in DEFAULT_CONFIG_PATHS {
            match Self::build(config_path) {
                Ok(config) => {
                    info!("Loaded configuration from {}.toml", config_path);
                    return Ok(config);
                }
                Err(e) => {
                    debug!("No usable configuration at {}: {}", config_path, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(ConfigError::EmptyRootSet))
    }

    /// Load configuration from an explicit file with environment overrides
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let config = Self::build(path)?;
        info!("Loaded configuration from {}", path);
        Ok(config)
    }

    /// Parse configuration from TOML text, without environment overrides
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()?;
        let config: FsConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn build(path: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("allowed_directories"),
            )
            .build()?;

        let config: FsConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.unrestricted && self.allowed_directories.is_empty() {
            return Err(ConfigError::EmptyRootSet);
        }

        for mode in [&self.directory_mode, &self.parent_directory_mode] {
            if parse_octal_mode(mode).is_none() {
                return Err(ConfigError::InvalidMode(mode.clone()));
            }
        }

        Ok(())
    }

    /// Build the sandbox described by this configuration
    pub fn build_sandbox(&self) -> Result<Sandbox, ConfigError> {
        if self.unrestricted {
            return Ok(Sandbox::unrestricted());
        }
        Sandbox::new(&self.allowed_directories)
    }

    /// Directory creation defaults from the configured modes
    pub fn create_options(&self) -> Result<CreateOptions, ConfigError> {
        let mode = parse_octal_mode(&self.directory_mode)
            .ok_or_else(|| ConfigError::InvalidMode(self.directory_mode.clone()))?;
        let parent_mode = parse_octal_mode(&self.parent_directory_mode)
            .ok_or_else(|| ConfigError::InvalidMode(self.parent_directory_mode.clone()))?;

        Ok(CreateOptions {
            mode,
            parent_mode,
            ..CreateOptions::default()
        })
    }
}
