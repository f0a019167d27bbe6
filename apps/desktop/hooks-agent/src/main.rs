use hooks_agent::build_dispatch_table;
use hooks_agent::collaborators::LoggingDesktop;
use hooks_agent::error::AgentError;
use hooks_agent::logger::{initialize as LoggerInitialize, parse_level};
use hooks_agent::paths::AgentPaths;

use hooks_core::HookClientBuilder;
use hooks_core::config::HooksConfig;

use common::ErrorLocation;

use std::panic::Location;
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::signal::ctrl_c;

#[tokio::main]
async fn main() -> Result<(), AgentError> {
    let paths = AgentPaths::resolve()?;
    paths.ensure_log_dir()?;

    // Logging is not up yet, so a bad config is reported after initialization
    let (config, config_error) = match HooksConfig::load(&paths.config_dir) {
        Ok(config) => (config, None),
        Err(e) => (HooksConfig::default(), Some(e)),
    };

    LoggerInitialize(&paths.log_dir, parse_level(&config.logging.level)?)?;

    info!("Dropbox hooks agent starting");
    info!("Config directory: {}", paths.config_dir.display());
    info!("Log directory: {}", paths.log_dir.display());
    if let Some(e) = config_error {
        warn!("Ignoring unusable config, using defaults: {e}");
    }

    let desktop = Arc::new(LoggingDesktop::new());
    let table = build_dispatch_table(&config, desktop);

    let client = HookClientBuilder::new()
        .with_config(&config)
        .on_disconnect(|| debug!("Hook connection closed"))
        .start(table)?;

    info!("Watching hook socket {}", client.socket_path().display());

    ctrl_c().await.map_err(|e| AgentError::Agent {
        message: format!("Failed to listen for shutdown signal: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })?;

    client.shutdown().await?;
    info!("Dropbox hooks agent stopped");
    Ok(())
}
