//! Built-in hook handlers.
//!
//! The daemon uses these commands to poke the desktop: refresh a file's
//! status emblem, fill the clipboard, open a URL or a folder. Everything that
//! touches the desktop goes through a collaborator trait so the host decides
//! what "clipboard" or "file status" means.

pub mod clipboard;
pub mod file_status;
pub mod launch;

pub use clipboard::CopyToClipboardHandler;
pub use file_status::ShellTouchHandler;
pub use launch::{LaunchFolderHandler, LaunchUrlHandler, ProcessLauncher};

use crate::dispatch::DispatchTable;
use crate::error::HandlerError;

use std::sync::Arc;

use log::debug;

pub const SHELL_TOUCH: &str = "shell_touch";
pub const COPY_TO_CLIPBOARD: &str = "copy_to_clipboard";
pub const LAUNCH_URL: &str = "launch_url";
pub const LAUNCH_FOLDER: &str = "launch_folder";

/// Invalidates cached file-manager metadata for a path.
pub trait FileStatusCache: Send + Sync {
    fn invalidate(&self, path: &str);
}

pub trait Clipboard: Send + Sync {
    fn set_text(&self, text: &str);
}

/// Opens URLs and folders with external programs. Must return without
/// waiting for the program to exit.
pub trait Launcher: Send + Sync {
    /// Program used for URLs, for user-facing failure messages.
    fn url_opener(&self) -> &str;

    /// # Errors
    ///
    /// Returns [`HandlerError::Launch`] if the program could not be started.
    fn open_url(&self, url: &str) -> Result<(), HandlerError>;

    /// # Errors
    ///
    /// Returns [`HandlerError::Launch`] if the program could not be started.
    fn open_folder(&self, path: &str) -> Result<(), HandlerError>;
}

/// User-visible notifications (tray bubble or equivalent).
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, message: &str);
}

#[derive(Clone)]
pub struct Collaborators {
    pub file_status: Arc<dyn FileStatusCache>,
    pub clipboard: Arc<dyn Clipboard>,
    pub launcher: Arc<dyn Launcher>,
    pub notifier: Arc<dyn Notifier>,
}

/// Register `shell_touch`, `copy_to_clipboard`, `launch_url` and `launch_folder`.
///
/// Hosts may register their own handlers before or after; the last
/// registration for a name wins.
pub fn register_default_handlers(table: &mut DispatchTable, collaborators: Collaborators) {
    table
        .register(
            SHELL_TOUCH,
            ShellTouchHandler::new(collaborators.file_status),
        )
        .register(
            COPY_TO_CLIPBOARD,
            CopyToClipboardHandler::new(collaborators.clipboard),
        )
        .register(
            LAUNCH_URL,
            LaunchUrlHandler::new(
                Arc::clone(&collaborators.launcher),
                collaborators.notifier,
            ),
        )
        .register(
            LAUNCH_FOLDER,
            LaunchFolderHandler::new(collaborators.launcher),
        );

    debug!("Registered built-in hook handlers");
}
