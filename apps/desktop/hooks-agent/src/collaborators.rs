//! Desktop collaborators for a headless agent.
//!
//! There is no file manager extension or tray behind this binary, so file
//! status changes and notifications are logged, and clipboard text is kept in
//! memory where the rest of the process can read it.

use hooks_core::handlers::{Clipboard, FileStatusCache, Notifier};

use std::sync::{Mutex, PoisonError};

use log::{info, warn};

#[derive(Debug, Default)]
pub struct LoggingDesktop {
    clipboard: Mutex<Option<String>>,
}

impl LoggingDesktop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clipboard_text(&self) -> Option<String> {
        self.clipboard
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl FileStatusCache for LoggingDesktop {
    fn invalidate(&self, path: &str) {
        info!("File status changed: {path}");
    }
}

impl Clipboard for LoggingDesktop {
    fn set_text(&self, text: &str) {
        info!("Clipboard set ({} bytes)", text.len());
        *self
            .clipboard
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(text.to_string());
    }
}

impl Notifier for LoggingDesktop {
    fn notify(&self, title: &str, message: &str) {
        warn!("{title}: {message}");
    }
}
