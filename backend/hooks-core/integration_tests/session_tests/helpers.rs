//! Test helpers for session integration tests.
//!
//! A `FakeDaemon` binds a real Unix socket in a temp directory and plays the
//! Dropbox side of the hook protocol: accept, write commands, hang up.

use hooks_core::{DispatchTable, HookClient, HookClientBuilder, SessionHandle};
use models::Command;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tokio::task::spawn_blocking;
use tokio::time::timeout;

/// Retry interval short enough to keep tests fast.
pub const TEST_RETRY_INTERVAL: Duration = Duration::from_millis(50);

/// Upper bound for anything the tests wait on.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

pub struct FakeDaemon {
    _dir: TempDir,
    path: PathBuf,
    listener: Option<UnixListener>,
}

impl FakeDaemon {
    /// Bind `iface_socket` in a fresh temp directory.
    pub fn bind() -> Self {
        let mut daemon = Self::unbound();
        daemon.listen();
        daemon
    }

    /// Reserve a socket path without listening on it yet.
    pub fn unbound() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("iface_socket");
        Self {
            _dir: dir,
            path,
            listener: None,
        }
    }

    pub fn listen(&mut self) {
        self.listener = Some(UnixListener::bind(&self.path).expect("Failed to bind hook socket"));
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Accept the next client connection, failing the test after [`TEST_TIMEOUT`].
    pub async fn accept(&self) -> UnixStream {
        let listener = self.listener.as_ref().expect("daemon is not listening");
        let (stream, _) = timeout(TEST_TIMEOUT, listener.accept())
            .await
            .expect("client did not connect in time")
            .expect("accept failed");
        stream
    }
}

pub async fn send(stream: &mut UnixStream, text: &str) {
    stream
        .write_all(text.as_bytes())
        .await
        .expect("Failed to write to client");
}

/// True once the client has closed its end.
pub async fn closed_by_client(stream: &mut UnixStream) -> bool {
    let mut buf = [0u8; 64];
    matches!(timeout(TEST_TIMEOUT, stream.read(&mut buf)).await, Ok(Ok(0)) | Ok(Err(_)))
}

/// Block on a worker thread until the connected flag reaches `connected`.
pub async fn wait_connected(handle: &SessionHandle, connected: bool) -> bool {
    let handle = handle.clone();
    spawn_blocking(move || handle.wait_until_connected_timeout(connected, TEST_TIMEOUT))
        .await
        .expect("waiter thread panicked")
}

/// A table that forwards every command named in `names` to the returned receiver.
pub fn forwarding_table(names: &[&str]) -> (DispatchTable, UnboundedReceiver<Command>) {
    let (tx, rx) = unbounded_channel();
    let mut table = DispatchTable::new();
    for name in names {
        let tx = tx.clone();
        table.register(*name, move |_session: &SessionHandle, command: &Command| {
            let _ = tx.send(command.clone());
        });
    }
    (table, rx)
}

pub async fn next_command(rx: &mut UnboundedReceiver<Command>) -> Command {
    timeout(TEST_TIMEOUT, rx.recv())
        .await
        .expect("no command dispatched in time")
        .expect("dispatch channel closed")
}

/// Start a client against `daemon` with a counter bumped on every disconnect.
pub fn start_client(daemon: &FakeDaemon, table: DispatchTable) -> (HookClient, Arc<AtomicUsize>) {
    let disconnects = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&disconnects);
    let client = HookClientBuilder::new()
        .with_socket_path(daemon.path())
        .with_retry_interval(TEST_RETRY_INTERVAL)
        .on_disconnect(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .start(table)
        .expect("Failed to start hook client");
    (client, disconnects)
}
