//! `launch_url` / `launch_folder` and the process-spawning launcher behind them.

use crate::config::LaunchConfig;
use crate::dispatch::CommandHandler;
use crate::error::HandlerError;
use crate::handlers::{Launcher, Notifier};
use crate::session::SessionHandle;

use common::ErrorLocation;
use models::Command;

use std::panic::Location;
use std::process::Stdio;
use std::sync::Arc;

use log::{debug, warn};
use tokio::process::Command as TokioCommand;
use tokio::spawn as TokioSpawn;

const URL_ARGUMENT: &str = "url";
const PATH_ARGUMENT: &str = "path";
const LAUNCH_FAILED_TITLE: &str = "Couldn't launch browser";

pub struct LaunchUrlHandler {
    launcher: Arc<dyn Launcher>,
    notifier: Arc<dyn Notifier>,
}

impl LaunchUrlHandler {
    pub fn new(launcher: Arc<dyn Launcher>, notifier: Arc<dyn Notifier>) -> Self {
        Self { launcher, notifier }
    }
}

impl CommandHandler for LaunchUrlHandler {
    fn handle(&self, _session: &SessionHandle, command: &Command) {
        let Some(url) = command.first_argument(URL_ARGUMENT) else {
            return;
        };

        if let Err(e) = self.launcher.open_url(url) {
            warn!("{e}");
            let opener = self.launcher.url_opener();
            self.notifier.notify(
                LAUNCH_FAILED_TITLE,
                &format!(
                    "Couldn't start '{opener} {url}'. Please check and see if you have the '{opener}' program installed."
                ),
            );
        }
    }
}

/// Failures are logged only; the daemon does not expect a reply.
pub struct LaunchFolderHandler {
    launcher: Arc<dyn Launcher>,
}

impl LaunchFolderHandler {
    pub fn new(launcher: Arc<dyn Launcher>) -> Self {
        Self { launcher }
    }
}

impl CommandHandler for LaunchFolderHandler {
    fn handle(&self, _session: &SessionHandle, command: &Command) {
        let Some(path) = command.first_argument(PATH_ARGUMENT) else {
            return;
        };

        if let Err(e) = self.launcher.open_folder(path) {
            warn!("{e}");
        }
    }
}

/// Starts `<opener> <target>` as a child process without a shell.
///
/// The target is passed as a single argument, so paths with spaces or quotes
/// need no escaping. Children are reaped on a background task.
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    url_opener: String,
    folder_opener: String,
}

impl ProcessLauncher {
    pub fn new(url_opener: impl Into<String>, folder_opener: impl Into<String>) -> Self {
        Self {
            url_opener: url_opener.into(),
            folder_opener: folder_opener.into(),
        }
    }

    pub fn from_config(config: &LaunchConfig) -> Self {
        Self::new(config.url_opener.clone(), config.folder_opener.clone())
    }

    /// Must be called from within a Tokio runtime.
    #[track_caller]
    fn spawn_detached(program: &str, target: &str) -> Result<(), HandlerError> {
        let mut command = TokioCommand::new(program);
        command
            .arg(target)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let mut child = command.spawn().map_err(|e| HandlerError::Launch {
            message: format!("Failed to start '{program} {target}'"),
            location: ErrorLocation::from(Location::caller()),
            source: e,
        })?;

        debug!("Started {program} (PID: {:?})", child.id());

        let program = program.to_string();
        TokioSpawn(async move {
            match child.wait().await {
                Ok(status) if !status.success() => debug!("{program} exited with {status}"),
                Ok(_) => {}
                Err(e) => debug!("Failed to wait for {program}: {e}"),
            }
        });

        Ok(())
    }
}

impl Launcher for ProcessLauncher {
    fn url_opener(&self) -> &str {
        &self.url_opener
    }

    fn open_url(&self, url: &str) -> Result<(), HandlerError> {
        Self::spawn_detached(&self.url_opener, url)
    }

    fn open_folder(&self, path: &str) -> Result<(), HandlerError> {
        Self::spawn_detached(&self.folder_opener, path)
    }
}
