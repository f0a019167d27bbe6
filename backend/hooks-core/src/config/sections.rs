use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_RETRY_INTERVAL_MS: u64 = 1_000;
pub const DEFAULT_MAX_ARGUMENTS: usize = 20;
pub const DEFAULT_URL_OPENER: &str = "gnome-open";
pub const DEFAULT_FOLDER_OPENER: &str = "nautilus";
pub const DEFAULT_LOG_LEVEL: &str = "info";

// ============================================
// CONNECTION
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Overrides `<home>/.dropbox/iface_socket` when set.
    #[serde(default)]
    pub socket_path: Option<String>,
    #[serde(default = "default_retry_interval_ms")]
    pub retry_interval_ms: u64,
    #[serde(default = "default_max_arguments")]
    pub max_arguments: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            socket_path: None,
            retry_interval_ms: default_retry_interval_ms(),
            max_arguments: default_max_arguments(),
        }
    }
}

impl ConnectionConfig {
    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }
}

// ============================================
// LAUNCH
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchConfig {
    #[serde(default = "default_url_opener")]
    pub url_opener: String,
    #[serde(default = "default_folder_opener")]
    pub folder_opener: String,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            url_opener: default_url_opener(),
            folder_opener: default_folder_opener(),
        }
    }
}

// ============================================
// LOGGING
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ============================================
// DEFAULT FUNCTIONS
// ============================================

fn default_retry_interval_ms() -> u64 {
    DEFAULT_RETRY_INTERVAL_MS
}
fn default_max_arguments() -> usize {
    DEFAULT_MAX_ARGUMENTS
}
fn default_url_opener() -> String {
    DEFAULT_URL_OPENER.to_string()
}
fn default_folder_opener() -> String {
    DEFAULT_FOLDER_OPENER.to_string()
}
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
