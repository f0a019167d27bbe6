//! On-disk configuration for the hook client.
//!
//! Stored as `hooks-config.json` in the host's config directory. Every field
//! has a default, so a missing file or a partial file is valid.

pub mod sections;

pub use sections::{ConnectionConfig, LaunchConfig, LoggingConfig};

use crate::error::config::ConfigError;

use common::ErrorLocation;

use std::fs::{create_dir_all, read_to_string, rename, write};
use std::panic::Location;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = "hooks-config.json";
const CONFIG_VERSION: u32 = 1;
const MAX_RETRY_INTERVAL_MS: u64 = 60_000;
const MAX_ARGUMENTS_LIMIT: usize = 1_024;
const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HooksConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub connection: ConnectionConfig,

    #[serde(default)]
    pub launch: LaunchConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for HooksConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            connection: ConnectionConfig::default(),
            launch: LaunchConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

impl HooksConfig {
    /// Load config from `{config_dir}/hooks-config.json`.
    ///
    /// # Returns
    ///
    /// Returns defaults if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read, parsed, or validated.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            info!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents = read_to_string(&config_path).map_err(|e| {
            warn!("Failed to read config file: {e}");
            ConfigError::ReadError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                source: e,
            }
        })?;

        let config: HooksConfig = serde_json::from_str(&contents).map_err(|e| {
            warn!("Failed to parse config JSON: {e}");
            ConfigError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                reason: e.to_string(),
            }
        })?;

        config.validate()?;

        info!("Config loaded from {}", config_path.display());
        Ok(config)
    }

    /// Save config to `{config_dir}/hooks-config.json` via temp file + rename.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if validation, directory creation, serialization,
    /// the write, or the rename fails.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        create_dir_all(config_dir).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: config_dir.to_path_buf(),
            source: e,
        })?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let temp_path = config_dir.join(format!("{CONFIG_FILE_NAME}.tmp"));

        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializeError {
            location: ErrorLocation::from(Location::caller()),
            reason: e.to_string(),
        })?;

        write(&temp_path, json).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: temp_path.clone(),
            source: e,
        })?;

        rename(&temp_path, &config_path).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: config_path.clone(),
            source: e,
        })?;

        info!("Config saved to {}", config_path.display());
        Ok(())
    }

    /// Validate config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 || self.version > CONFIG_VERSION {
            return Err(invalid(
                "version",
                format!("{} (expected 1-{CONFIG_VERSION})", self.version),
            ));
        }

        let connection = &self.connection;
        if connection.retry_interval_ms == 0 || connection.retry_interval_ms > MAX_RETRY_INTERVAL_MS
        {
            return Err(invalid(
                "connection.retry_interval_ms",
                format!(
                    "{} (must be 1-{MAX_RETRY_INTERVAL_MS})",
                    connection.retry_interval_ms
                ),
            ));
        }

        if connection.max_arguments == 0 || connection.max_arguments > MAX_ARGUMENTS_LIMIT {
            return Err(invalid(
                "connection.max_arguments",
                format!(
                    "{} (must be 1-{MAX_ARGUMENTS_LIMIT})",
                    connection.max_arguments
                ),
            ));
        }

        if let Some(ref socket_path) = connection.socket_path {
            if socket_path.is_empty() {
                return Err(invalid(
                    "connection.socket_path",
                    String::from("cannot be empty string"),
                ));
            }

            if !Path::new(socket_path).is_absolute() {
                return Err(invalid(
                    "connection.socket_path",
                    format!("{socket_path} is not an absolute path"),
                ));
            }
        }

        if self.launch.url_opener.trim().is_empty() {
            return Err(invalid("launch.url_opener", String::from("cannot be empty")));
        }

        if self.launch.folder_opener.trim().is_empty() {
            return Err(invalid(
                "launch.folder_opener",
                String::from("cannot be empty"),
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(invalid(
                "logging.level",
                format!(
                    "{} (expected one of {})",
                    self.logging.level,
                    LOG_LEVELS.join(", ")
                ),
            ));
        }

        Ok(())
    }
}

#[track_caller]
fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::ValidationError {
        location: ErrorLocation::from(Location::caller()),
        field,
        reason,
    }
}
