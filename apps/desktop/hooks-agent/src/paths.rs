//! Where the agent keeps its config and logs.
//!
//! `DROPBOX_HOOKS_HOME`, when set, holds both (`<home>/config`, `<home>/logs`).
//! Otherwise the platform config and local data directories are used.

use crate::error::AgentError;

use common::ErrorLocation;

use std::env::var_os;
use std::fs::create_dir_all;
use std::panic::Location;
use std::path::{Path, PathBuf};

pub const HOME_OVERRIDE_ENV: &str = "DROPBOX_HOOKS_HOME";
const APP_DIR_NAME: &str = "dropbox-hooks";
const CONFIG_DIR_NAME: &str = "config";
const LOGS_DIR_NAME: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentPaths {
    pub config_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl AgentPaths {
    /// Resolve from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Paths`] if there is no override and the platform
    /// directories are unknown.
    #[track_caller]
    pub fn resolve() -> Result<Self, AgentError> {
        let home_override = var_os(HOME_OVERRIDE_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        Self::resolve_with(home_override, dirs::config_dir(), dirs::data_local_dir())
    }

    /// Resolution with every input explicit.
    #[track_caller]
    pub fn resolve_with(
        home_override: Option<PathBuf>,
        config_base: Option<PathBuf>,
        data_base: Option<PathBuf>,
    ) -> Result<Self, AgentError> {
        if let Some(home) = home_override {
            return Ok(Self::under(&home));
        }

        match (config_base, data_base) {
            (Some(config_base), Some(data_base)) => Ok(Self {
                config_dir: config_base.join(APP_DIR_NAME),
                log_dir: data_base.join(APP_DIR_NAME).join(LOGS_DIR_NAME),
            }),
            _ => Err(AgentError::Paths {
                message: format!(
                    "Cannot determine config or data directory; set {HOME_OVERRIDE_ENV}"
                ),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    pub fn under(home: &Path) -> Self {
        Self {
            config_dir: home.join(CONFIG_DIR_NAME),
            log_dir: home.join(LOGS_DIR_NAME),
        }
    }

    /// Create the log directory. The config directory is created on first save.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Paths`] if the directory cannot be created.
    #[track_caller]
    pub fn ensure_log_dir(&self) -> Result<(), AgentError> {
        create_dir_all(&self.log_dir).map_err(|e| AgentError::Paths {
            message: format!(
                "Failed to create log directory {}: {e}",
                self.log_dir.display()
            ),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}
