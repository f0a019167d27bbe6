use crate::dispatch::CommandHandler;
use crate::handlers::FileStatusCache;
use crate::session::SessionHandle;

use models::Command;

use std::sync::Arc;

use log::trace;

const PATH_ARGUMENT: &str = "path";

/// `shell_touch`: the daemon changed a file's sync status.
pub struct ShellTouchHandler {
    cache: Arc<dyn FileStatusCache>,
}

impl ShellTouchHandler {
    pub fn new(cache: Arc<dyn FileStatusCache>) -> Self {
        Self { cache }
    }
}

impl CommandHandler for ShellTouchHandler {
    fn handle(&self, _session: &SessionHandle, command: &Command) {
        if let Some(path) = command.first_argument(PATH_ARGUMENT) {
            trace!("Invalidating file status for {path}");
            self.cache.invalidate(path);
        }
    }
}
