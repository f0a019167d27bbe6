use crate::codec::{TabSeparatedCodec, WireCodec};
use crate::config::HooksConfig;
use crate::config::sections::{DEFAULT_MAX_ARGUMENTS, DEFAULT_RETRY_INTERVAL_MS};
use crate::dispatch::DispatchTable;
use crate::error::{ConfigError, HooksError};
use crate::protocol::ProtocolCoroutine;
use crate::session::connection_state::ConnectionState;
use crate::session::event_loop::{DisconnectListener, Session};
use crate::session::handle::SessionHandle;
use crate::session::socket_path::resolve_socket_path;
use crate::session::HookClient;

use common::ErrorLocation;

use std::panic::Location;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use backoff::backoff::Constant;
use log::info;
use tokio::spawn as TokioSpawn;
use tokio::sync::mpsc::unbounded_channel;

/// Fluent setup for a [`HookClient`].
///
/// Unset values fall back to the defaults: `<home>/.dropbox/iface_socket`,
/// a one second retry interval, 20 argument lines per command, and the
/// daemon's tab-separated codec.
#[derive(Default)]
pub struct HookClientBuilder {
    socket_path: Option<PathBuf>,
    retry_interval: Option<Duration>,
    max_arguments: Option<usize>,
    codec: Option<Arc<dyn WireCodec>>,
    disconnect_listeners: Vec<DisconnectListener>,
}

impl HookClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the `connection` section of `config`.
    pub fn with_config(mut self, config: &HooksConfig) -> Self {
        let connection = &config.connection;
        if let Some(ref path) = connection.socket_path {
            self.socket_path = Some(PathBuf::from(path));
        }
        self.retry_interval = Some(connection.retry_interval());
        self.max_arguments = Some(connection.max_arguments);
        self
    }

    pub fn with_socket_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.socket_path = Some(path.into());
        self
    }

    pub fn with_retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = Some(interval);
        self
    }

    pub fn with_max_arguments(mut self, max_arguments: usize) -> Self {
        self.max_arguments = Some(max_arguments);
        self
    }

    pub fn with_codec(mut self, codec: Arc<dyn WireCodec>) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Run `listener` on the session task each time a connection is torn
    /// down, after the disconnected state has been published.
    pub fn on_disconnect<F>(mut self, listener: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.disconnect_listeners.push(Arc::new(listener));
        self
    }

    /// Spawn the session task and begin connecting.
    ///
    /// `table` moves into the session; no handler can be registered after this.
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`HooksError`] if the socket path cannot be resolved or a
    /// setting is out of range.
    #[track_caller]
    pub fn start(self, table: DispatchTable) -> Result<HookClient, HooksError> {
        let socket_path = match self.socket_path {
            Some(path) => path,
            None => resolve_socket_path(&Default::default())?.path,
        };

        let retry_interval = self
            .retry_interval
            .unwrap_or(Duration::from_millis(DEFAULT_RETRY_INTERVAL_MS));
        if retry_interval.is_zero() {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                field: "retry_interval",
                reason: String::from("must be greater than zero"),
            }
            .into());
        }

        let max_arguments = self.max_arguments.unwrap_or(DEFAULT_MAX_ARGUMENTS);
        if max_arguments == 0 {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                field: "max_arguments",
                reason: String::from("must be greater than zero"),
            }
            .into());
        }

        let codec = self
            .codec
            .unwrap_or_else(|| Arc::new(TabSeparatedCodec));

        let (command_tx, command_rx) = unbounded_channel();
        let handle = SessionHandle::new(command_tx, Arc::new(ConnectionState::new()));

        info!(
            "Starting hook client for {} ({} handler(s), retry every {retry_interval:?})",
            socket_path.display(),
            table.len()
        );

        let session = Session {
            socket_path: socket_path.clone(),
            retry: Constant::new(retry_interval),
            retry_interval,
            coroutine: ProtocolCoroutine::new(codec, max_arguments),
            table,
            handle: handle.clone(),
            commands: command_rx,
            disconnect_listeners: self.disconnect_listeners,
        };

        let task = TokioSpawn(session.run());

        Ok(HookClient {
            handle,
            socket_path,
            task,
        })
    }
}
