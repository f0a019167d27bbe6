use crate::session::connection_state::ConnectionState;

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::mpsc::UnboundedSender;

/// Requests executed on the session task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SessionCommand {
    ForceReconnect,
    Shutdown,
}

/// Cheap, cloneable view of a running hook session.
///
/// Passed to every handler and available to the host through
/// [`HookClient::handle`](crate::session::HookClient::handle).
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: UnboundedSender<SessionCommand>,
    state: Arc<ConnectionState>,
}

impl SessionHandle {
    pub(crate) fn new(commands: UnboundedSender<SessionCommand>, state: Arc<ConnectionState>) -> Self {
        Self { commands, state }
    }

    /// Tear down the current connection and start a fresh one.
    ///
    /// The request runs on the session task after the current readiness
    /// callback returns, so handlers may call it. If no connection is live when
    /// the request is processed it does nothing.
    pub fn force_reconnect(&self) {
        info!("Hook client reconnect requested");
        if self.commands.send(SessionCommand::ForceReconnect).is_err() {
            warn!("Hook session has stopped, reconnect request dropped");
        }
    }

    /// Block the calling thread until the connected flag equals `connected`.
    ///
    /// Never call this from a handler or from a Tokio worker driving the
    /// session: the transition it waits for is made by that same task.
    pub fn wait_until_connected(&self, connected: bool) {
        self.state.wait_until(connected);
    }

    /// Bounded form of [`SessionHandle::wait_until_connected`].
    ///
    /// Returns `true` if the flag reached `connected` before `timeout` elapsed.
    pub fn wait_until_connected_timeout(&self, connected: bool, timeout: Duration) -> bool {
        self.state.wait_until_timeout(connected, timeout)
    }

    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    pub(crate) fn request_shutdown(&self) {
        if self.commands.send(SessionCommand::Shutdown).is_err() {
            debug!("Hook session already stopped");
        }
    }

    pub(crate) fn state(&self) -> &ConnectionState {
        &self.state
    }
}
