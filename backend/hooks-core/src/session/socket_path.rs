//! Location of the daemon's hook socket.
//!
//! Lookup order:
//! 1. `connection.socket_path` from configuration (explicit override)
//! 2. `<home>/.dropbox/iface_socket`, home directory via the `dirs` crate

use crate::config::ConnectionConfig;
use crate::error::ConnectionError;

use common::ErrorLocation;

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::panic::Location;
use std::path::PathBuf;

use const_format::concatcp;
use log::debug;

pub const DROPBOX_DIR_NAME: &str = ".dropbox";
pub const HOOK_SOCKET_NAME: &str = "iface_socket";
pub const HOOK_SOCKET_RELATIVE_PATH: &str = concatcp!(DROPBOX_DIR_NAME, "/", HOOK_SOCKET_NAME);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketPath {
    pub path: PathBuf,
    pub source: PathSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSource {
    ConfigOverride,
    HomeDirectory,
}

impl Display for PathSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        match self {
            PathSource::ConfigOverride => write!(f, "config override"),
            PathSource::HomeDirectory => write!(f, "home directory"),
        }
    }
}

/// Resolve the hook socket path for `config`.
///
/// # Errors
///
/// Returns [`ConnectionError::SocketPath`] if there is no override and the
/// home directory cannot be determined.
#[track_caller]
pub fn resolve_socket_path(config: &ConnectionConfig) -> Result<SocketPath, ConnectionError> {
    if let Some(ref path) = config.socket_path {
        debug!("Using configured hook socket {path}");
        return Ok(SocketPath {
            path: PathBuf::from(path),
            source: PathSource::ConfigOverride,
        });
    }

    let home = dirs::home_dir().ok_or_else(|| ConnectionError::SocketPath {
        message: String::from("cannot determine home directory for the hook socket"),
        location: ErrorLocation::from(Location::caller()),
    })?;

    Ok(SocketPath {
        path: home.join(HOOK_SOCKET_RELATIVE_PATH),
        source: PathSource::HomeDirectory,
    })
}
