//! Session lifecycle for the single hook connection.
//!
//! A [`HookClient`] owns one background task that keeps a connection to the
//! daemon alive: it connects (retrying at a fixed interval), feeds readiness
//! events to the protocol parser, and on any teardown publishes
//! `connected = false`, releases parser state, and reconnects immediately.

mod builder;
mod connection_state;
mod event_loop;
mod handle;
pub mod socket_path;

pub use builder::HookClientBuilder;
pub use handle::SessionHandle;
pub use socket_path::{PathSource, SocketPath, resolve_socket_path};

pub(crate) use connection_state::ConnectionState;
pub(crate) use event_loop::drain_stale_requests;
pub(crate) use handle::SessionCommand;

use crate::dispatch::DispatchTable;
use crate::error::{ConnectionError, HooksError};

use common::ErrorLocation;

use std::panic::Location;
use std::path::{Path, PathBuf};

use log::info;
use tokio::task::JoinHandle;

/// Handle to a running hook session.
///
/// Dropping it does not stop the session task; call
/// [`HookClient::shutdown`] for an orderly stop.
pub struct HookClient {
    pub(crate) handle: SessionHandle,
    pub(crate) socket_path: PathBuf,
    pub(crate) task: JoinHandle<()>,
}

impl HookClient {
    /// Start with default settings. See [`HookClientBuilder::start`].
    #[track_caller]
    pub fn start(table: DispatchTable) -> Result<Self, HooksError> {
        HookClientBuilder::new().start(table)
    }

    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Close the connection, publish `connected = false`, and wait for the
    /// session task to finish.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::Stopped`] if the session task panicked. The
    /// connected flag is cleared either way.
    pub async fn shutdown(self) -> Result<(), HooksError> {
        info!("Shutting down hook client");
        self.handle.request_shutdown();

        if let Err(e) = self.task.await {
            self.handle.state().set_connected(false);
            return Err(ConnectionError::Stopped {
                message: format!("hook session task failed: {e}"),
                location: ErrorLocation::from(Location::caller()),
            }
            .into());
        }

        Ok(())
    }
}
