//! The session task: connect, serve readiness events, tear down, repeat.
//!
//! This task is the only owner of the socket, the parser state and the
//! dispatch table. Every transition of the connected flag happens here.

use crate::dispatch::DispatchTable;
use crate::error::{ConnectionError, HooksError};
use crate::protocol::ProtocolCoroutine;
use crate::session::handle::{SessionCommand, SessionHandle};

use common::ErrorLocation;

use std::io::Error as IoError;
use std::panic::Location;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use backoff::backoff::{Backoff, Constant};
use log::{debug, info, warn};
use tokio::net::UnixStream;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::sleep as TokioSleep;
use uuid::Uuid;

pub(crate) type DisconnectListener = Arc<dyn Fn() + Send + Sync>;

/// A live connection. Dropping it closes the socket.
struct Connection {
    id: Uuid,
    stream: UnixStream,
}

enum Wake {
    Readable(Result<(), IoError>),
    Command(SessionCommand),
}

enum ServeOutcome {
    Lost(HooksError),
    Forced,
    Shutdown,
}

pub(crate) struct Session {
    pub(crate) socket_path: PathBuf,
    pub(crate) retry: Constant,
    pub(crate) retry_interval: Duration,
    pub(crate) coroutine: ProtocolCoroutine,
    pub(crate) table: DispatchTable,
    pub(crate) handle: SessionHandle,
    pub(crate) commands: UnboundedReceiver<SessionCommand>,
    pub(crate) disconnect_listeners: Vec<DisconnectListener>,
}

/// Publishes `connected = false` when the session task ends, however it ends.
///
/// A panic that unwinds out of [`Session::run`] would otherwise leave the flag
/// at `true` with no stream behind it.
struct ClearOnExit {
    handle: SessionHandle,
}

impl Drop for ClearOnExit {
    fn drop(&mut self) {
        if self.handle.state().set_connected(false) {
            warn!("Hook session ended while connected");
        }
    }
}

/// Discard queued reconnect requests; they were made against a connection that
/// no longer exists.
///
/// Returns `false` if a shutdown request was among them.
pub(crate) fn drain_stale_requests(commands: &mut UnboundedReceiver<SessionCommand>) -> bool {
    let mut keep_running = true;
    while let Ok(command) = commands.try_recv() {
        match command {
            SessionCommand::ForceReconnect => {
                debug!("Hook client not connected, ignoring reconnect request");
            }
            SessionCommand::Shutdown => keep_running = false,
        }
    }
    keep_running
}

impl Session {
    pub(crate) async fn run(mut self) {
        info!(
            "Hook session started for {}",
            self.socket_path.display()
        );
        let _clear_on_exit = ClearOnExit {
            handle: self.handle.clone(),
        };

        while let Some(mut connection) = self.connect_until_ready().await {
            let outcome = self.serve(&mut connection).await;
            if !self.teardown(connection, outcome) {
                break;
            }
        }

        info!("Hook session stopped");
    }

    /// Attempt to connect until one attempt succeeds.
    ///
    /// Returns `None` if shutdown was requested while waiting.
    async fn connect_until_ready(&mut self) -> Option<Connection> {
        loop {
            match self.connect_attempt().await {
                Ok(connection) => {
                    self.handle.state().set_connected(true);
                    info!(
                        "Hook client connected to {} (connection {})",
                        self.socket_path.display(),
                        connection.id
                    );

                    // Requests queued during the attempt predate this connection.
                    if !drain_stale_requests(&mut self.commands) {
                        self.teardown(connection, ServeOutcome::Shutdown);
                        return None;
                    }
                    return Some(connection);
                }
                Err(e) => {
                    let delay = self.retry.next_backoff().unwrap_or(self.retry_interval);
                    debug!("Hook socket unavailable, retrying in {delay:?}: {e}");
                    if !self.idle_for(delay).await {
                        return None;
                    }
                }
            }
        }
    }

    async fn connect_attempt(&self) -> Result<Connection, ConnectionError> {
        let stream = UnixStream::connect(&self.socket_path)
            .await
            .map_err(|e| ConnectionError::Connect {
                message: format!("Failed to connect to {}", self.socket_path.display()),
                location: ErrorLocation::from(Location::caller()),
                source: e,
            })?;

        Ok(Connection {
            id: Uuid::new_v4(),
            stream,
        })
    }

    /// Wait out a retry delay while still answering control requests.
    ///
    /// Returns `false` if shutdown was requested.
    async fn idle_for(&mut self, delay: Duration) -> bool {
        let sleep = TokioSleep(delay);
        tokio::pin!(sleep);

        // The session holds a sender through its own handle, so the channel never closes.
        loop {
            tokio::select! {
                () = &mut sleep => return true,
                Some(command) = self.commands.recv() => match command {
                    SessionCommand::ForceReconnect => {
                        debug!("Hook client not connected, ignoring reconnect request");
                    }
                    SessionCommand::Shutdown => return false,
                },
            }
        }
    }

    /// Drive the parser on every readiness event until the connection ends.
    async fn serve(&mut self, connection: &mut Connection) -> ServeOutcome {
        loop {
            let wake = tokio::select! {
                readiness = connection.stream.readable() => Wake::Readable(readiness),
                Some(command) = self.commands.recv() => Wake::Command(command),
            };

            match wake {
                Wake::Readable(Err(e)) => {
                    return ServeOutcome::Lost(
                        ConnectionError::Read {
                            message: String::from("hook socket readiness failed"),
                            location: ErrorLocation::from(Location::caller()),
                            source: e,
                        }
                        .into(),
                    );
                }
                Wake::Readable(Ok(())) => {
                    if let Err(e) =
                        self.coroutine
                            .on_readable(&mut connection.stream, &self.table, &self.handle)
                    {
                        return ServeOutcome::Lost(e);
                    }
                }
                Wake::Command(SessionCommand::ForceReconnect) => return ServeOutcome::Forced,
                Wake::Command(SessionCommand::Shutdown) => return ServeOutcome::Shutdown,
            }
        }
    }

    /// Release everything tied to `connection`.
    ///
    /// Returns `false` if the session should stop instead of reconnecting.
    fn teardown(&mut self, connection: Connection, outcome: ServeOutcome) -> bool {
        self.handle.state().set_connected(false);

        let mut keep_running = true;
        match outcome {
            ServeOutcome::Lost(e @ HooksError::Handler(_)) => {
                warn!("Hook connection {} dropped after handler failure: {e}", connection.id);
            }
            ServeOutcome::Lost(e) if e.is_protocol_violation() => {
                warn!("Hook connection {} violated the protocol: {e}", connection.id);
            }
            ServeOutcome::Lost(e) => {
                info!("Hook connection {} lost: {e}", connection.id);
            }
            ServeOutcome::Forced => {
                info!("Hook connection {} closed for reconnect", connection.id);
            }
            ServeOutcome::Shutdown => {
                info!("Hook connection {} closed for shutdown", connection.id);
                keep_running = false;
            }
        }

        for listener in &self.disconnect_listeners {
            listener();
        }

        if self.coroutine.release() {
            debug!("Released partially parsed hook command");
        }

        drop(connection);

        // Requests queued against the connection that just ended must not hit the next one.
        if !drain_stale_requests(&mut self.commands) {
            keep_running = false;
        }

        keep_running
    }
}
