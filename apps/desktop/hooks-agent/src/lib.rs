// Library exports for testing
// The binary (main.rs) imports these as well

pub mod collaborators;
pub mod error;
pub mod logger;
pub mod paths;

use crate::collaborators::LoggingDesktop;

use hooks_core::DispatchTable;
use hooks_core::config::HooksConfig;
use hooks_core::handlers::{
    Clipboard, Collaborators, FileStatusCache, Launcher, Notifier, ProcessLauncher,
    register_default_handlers,
};

use std::sync::Arc;

#[cfg(test)]
mod tests;

/// Handler table for the agent: the built-in hooks wired to `desktop`, with
/// launches going through the programs named in `config.launch`.
pub fn build_dispatch_table(config: &HooksConfig, desktop: Arc<LoggingDesktop>) -> DispatchTable {
    let mut table = DispatchTable::new();
    register_default_handlers(
        &mut table,
        Collaborators {
            file_status: Arc::clone(&desktop) as Arc<dyn FileStatusCache>,
            clipboard: Arc::clone(&desktop) as Arc<dyn Clipboard>,
            launcher: Arc::new(ProcessLauncher::from_config(&config.launch)) as Arc<dyn Launcher>,
            notifier: desktop as Arc<dyn Notifier>,
        },
    );
    table
}
