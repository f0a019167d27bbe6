use crate::dispatch::CommandHandler;
use crate::handlers::Clipboard;
use crate::session::SessionHandle;

use models::Command;

use std::sync::Arc;

const TEXT_ARGUMENT: &str = "text";

/// `copy_to_clipboard`: typically a share link the user just created.
pub struct CopyToClipboardHandler {
    clipboard: Arc<dyn Clipboard>,
}

impl CopyToClipboardHandler {
    pub fn new(clipboard: Arc<dyn Clipboard>) -> Self {
        Self { clipboard }
    }
}

impl CommandHandler for CopyToClipboardHandler {
    fn handle(&self, _session: &SessionHandle, command: &Command) {
        if let Some(text) = command.first_argument(TEXT_ARGUMENT) {
            self.clipboard.set_text(text);
        }
    }
}
