use crate::session_tests::helpers::{
    FakeDaemon, TEST_RETRY_INTERVAL, closed_by_client, forwarding_table, next_command, send,
    start_client, wait_connected,
};

use hooks_core::codec::WireCodec;
use hooks_core::error::{ConfigError, ConnectionError, HooksError, ProtocolError};
use hooks_core::{DispatchTable, HookClientBuilder, SessionHandle};
use models::{Arguments, Command};

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use tokio::time::sleep;

/// **VALUE**: Verifies that the client keeps retrying until the daemon appears.
///
/// **WHY THIS MATTERS**: The client usually starts with the desktop session, before the
/// Dropbox daemon has created its socket.
///
/// **BUG THIS CATCHES**: Would catch the client giving up after the first failed connect.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn given_no_daemon_when_daemon_starts_later_then_client_connects() {
    // GIVEN: A client started against a socket nobody listens on
    let mut daemon = FakeDaemon::unbound();
    let (client, _disconnects) = start_client(&daemon, DispatchTable::new());
    sleep(TEST_RETRY_INTERVAL * 3).await;
    assert!(!client.handle().is_connected());

    // WHEN: The daemon starts listening
    daemon.listen();

    // THEN: The client connects on a later retry
    let _stream = daemon.accept().await;
    assert!(wait_connected(&client.handle(), true).await);

    client.shutdown().await.expect("clean shutdown");
}

/// **VALUE**: Verifies that a peer close tears down the connection and the client comes
/// straight back.
///
/// **BUG THIS CATCHES**: Would catch:
/// - The connected flag staying true after the peer hung up
/// - Disconnect listeners not running
/// - No reconnect after a clean EOF
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn given_connected_client_when_daemon_hangs_up_then_reconnects() {
    // GIVEN: A connected client
    let daemon = FakeDaemon::bind();
    let (client, disconnects) = start_client(&daemon, DispatchTable::new());
    let first = daemon.accept().await;
    assert!(wait_connected(&client.handle(), true).await);

    // WHEN: The daemon closes its end
    drop(first);

    // THEN: A second connection arrives and the listener ran once
    let _second = daemon.accept().await;
    assert!(wait_connected(&client.handle(), true).await);
    assert_eq!(disconnects.load(Ordering::SeqCst), 1);

    client.shutdown().await.expect("clean shutdown");
}

/// **VALUE**: Verifies that a host-requested reconnect closes the live connection and opens
/// a new one.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn given_connected_client_when_force_reconnect_then_new_connection() {
    // GIVEN: A connected client
    let daemon = FakeDaemon::bind();
    let (client, disconnects) = start_client(&daemon, DispatchTable::new());
    let mut first = daemon.accept().await;
    assert!(wait_connected(&client.handle(), true).await);

    // WHEN: The host asks for a reconnect
    client.handle().force_reconnect();

    // THEN: The old connection is closed and a new one is accepted
    assert!(closed_by_client(&mut first).await);
    let _second = daemon.accept().await;
    assert!(wait_connected(&client.handle(), true).await);
    assert_eq!(disconnects.load(Ordering::SeqCst), 1);

    client.shutdown().await.expect("clean shutdown");
}

/// **VALUE**: Verifies that a handler may request a reconnect from inside dispatch.
///
/// **WHY THIS MATTERS**: The daemon signals "start over" through a command. The request
/// must not tear the socket down under the running parser.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn given_handler_requests_reconnect_when_dispatched_then_client_reconnects() {
    // GIVEN: A handler that forces a reconnect
    let daemon = FakeDaemon::bind();
    let mut table = DispatchTable::new();
    table.register("reset", |session: &SessionHandle, _command: &Command| {
        session.force_reconnect();
    });
    let (client, disconnects) = start_client(&daemon, table);
    let mut first = daemon.accept().await;

    // WHEN: The daemon sends the command
    send(&mut first, "reset\ndone\n").await;

    // THEN: The client drops the connection and reconnects once
    assert!(closed_by_client(&mut first).await);
    let _second = daemon.accept().await;
    assert!(wait_connected(&client.handle(), true).await);
    assert_eq!(disconnects.load(Ordering::SeqCst), 1);

    client.shutdown().await.expect("clean shutdown");
}

/// **VALUE**: Verifies that a panicking handler costs one connection, not the session.
///
/// **WHY THIS MATTERS**: Handlers are host code. If a panic escaped into the session task,
/// the connected flag would stay true with nobody serving the socket.
///
/// **BUG THIS CATCHES**: Would catch:
/// - The session task dying on a handler panic
/// - Disconnect listeners not running for the dropped connection
/// - `shutdown` reporting failure after a recovered panic
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn given_panicking_handler_when_dispatched_then_connection_dropped_and_reconnected() {
    // GIVEN: A handler that panics
    let daemon = FakeDaemon::bind();
    let mut table = DispatchTable::new();
    table.register("boom", exploding_handler);
    let (client, disconnects) = start_client(&daemon, table);
    let mut first = daemon.accept().await;
    assert!(wait_connected(&client.handle(), true).await);

    // WHEN: The daemon sends the command
    send(&mut first, "boom\ndone\n").await;

    // THEN: The connection is torn down and a new one is made
    assert!(closed_by_client(&mut first).await);
    let _second = daemon.accept().await;
    assert!(wait_connected(&client.handle(), true).await);
    assert_eq!(disconnects.load(Ordering::SeqCst), 1);

    // THEN: The session is still healthy
    client.shutdown().await.expect("clean shutdown");
}

/// Codec that panics on every argument line.
struct PanickingCodec;

impl WireCodec for PanickingCodec {
    fn desanitize(&self, raw: &str) -> String {
        raw.to_string()
    }

    fn parse_argument(
        &self,
        _line: &str,
        _arguments: &mut Arguments,
    ) -> Result<(), ProtocolError> {
        panic!("codec exploded");
    }
}

/// **VALUE**: Verifies that the connected flag is cleared when the session task dies.
///
/// **WHY THIS MATTERS**: Hosts gate work on `is_connected` and block in
/// `wait_until_connected(false)`. A dead task must not leave them seeing a live session.
///
/// **BUG THIS CATCHES**: Would catch:
/// - The flag staying true after the task unwound
/// - `shutdown` returning `Stopped` without publishing disconnected
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn given_session_task_panics_when_shutdown_then_stopped_and_disconnected() {
    // GIVEN: A connected client whose codec panics
    let daemon = FakeDaemon::bind();
    let (table, _commands) = forwarding_table(&["copy_to_clipboard"]);
    let client = HookClientBuilder::new()
        .with_socket_path(daemon.path())
        .with_retry_interval(TEST_RETRY_INTERVAL)
        .with_codec(Arc::new(PanickingCodec))
        .start(table)
        .expect("Failed to start hook client");
    let mut stream = daemon.accept().await;
    let handle = client.handle();
    assert!(wait_connected(&handle, true).await);

    // WHEN: An argument line reaches the codec
    send(&mut stream, "copy_to_clipboard\ntext\tone\ndone\n").await;

    // THEN: The flag drops without any shutdown request
    assert!(wait_connected(&handle, false).await);

    // THEN: Shutdown reports the dead task and the flag stays cleared
    let result = client.shutdown().await;
    assert!(matches!(
        result,
        Err(HooksError::Connection(ConnectionError::Stopped { .. }))
    ));
    assert!(!handle.is_connected());
}

/// **VALUE**: Verifies that reconnect requests made while disconnected do nothing.
///
/// **WHY THIS MATTERS**: Hosts call `force_reconnect` without knowing the current state.
/// Stale requests must not tear down the connection that is eventually made.
///
/// **BUG THIS CATCHES**: Would catch:
/// - Queued requests being replayed against the next connection
/// - Disconnect listeners firing for a connection that never existed
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn given_disconnected_client_when_force_reconnect_repeated_then_no_op() {
    // GIVEN: A client retrying against a daemon that is not up
    let mut daemon = FakeDaemon::unbound();
    let (client, disconnects) = start_client(&daemon, DispatchTable::new());
    let handle = client.handle();

    // WHEN: Reconnect is requested several times while disconnected
    for _ in 0..5 {
        handle.force_reconnect();
    }
    sleep(TEST_RETRY_INTERVAL * 2).await;

    // THEN: Nothing was torn down
    assert_eq!(disconnects.load(Ordering::SeqCst), 0);
    assert!(!handle.is_connected());

    // THEN: The first real connection survives
    daemon.listen();
    let mut stream = daemon.accept().await;
    assert!(wait_connected(&handle, true).await);
    sleep(TEST_RETRY_INTERVAL * 2).await;
    assert!(handle.is_connected());
    assert_eq!(disconnects.load(Ordering::SeqCst), 0);
    send(&mut stream, "unknown\ndone\n").await;

    client.shutdown().await.expect("clean shutdown");
}

/// **VALUE**: Verifies that shutdown closes the socket, publishes disconnected, and wakes
/// blocked waiters.
///
/// **BUG THIS CATCHES**: Would catch a host thread blocked in `wait_until_connected(false)`
/// hanging forever after shutdown.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn given_connected_client_when_shutdown_then_disconnected_and_socket_closed() {
    // GIVEN: A connected client and a thread waiting for disconnect
    let daemon = FakeDaemon::bind();
    let (client, disconnects) = start_client(&daemon, DispatchTable::new());
    let mut stream = daemon.accept().await;
    let handle = client.handle();
    assert!(wait_connected(&handle, true).await);
    let waiter = {
        let handle = handle.clone();
        tokio::task::spawn_blocking(move || handle.wait_until_connected(false))
    };

    // WHEN: Shutting down
    client.shutdown().await.expect("clean shutdown");

    // THEN: Flag cleared, waiter released, daemon sees EOF, no reconnect
    assert!(!handle.is_connected());
    waiter.await.expect("waiter thread");
    assert!(closed_by_client(&mut stream).await);
    assert_eq!(disconnects.load(Ordering::SeqCst), 1);

    // THEN: Requests after shutdown are harmless
    handle.force_reconnect();
    assert!(!handle.is_connected());
}

/// **VALUE**: Verifies that shutdown works while the client is still retrying.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn given_retrying_client_when_shutdown_then_stops_promptly() {
    let daemon = FakeDaemon::unbound();
    let (client, disconnects) = start_client(&daemon, DispatchTable::new());

    let result = tokio::time::timeout(Duration::from_secs(1), client.shutdown()).await;

    assert!(matches!(result, Ok(Ok(()))));
    assert_eq!(disconnects.load(Ordering::SeqCst), 0);
}

/// **VALUE**: Verifies that the client handles several commands across reconnects.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn given_reconnect_when_daemon_sends_again_then_dispatch_continues() {
    let daemon = FakeDaemon::bind();
    let (table, mut commands) = forwarding_table(&["copy_to_clipboard"]);
    let (client, _disconnects) = start_client(&daemon, table);

    let mut first = daemon.accept().await;
    send(&mut first, "copy_to_clipboard\ntext\tone\ndone\n").await;
    assert_eq!(next_command(&mut commands).await.first_argument("text"), Some("one"));
    drop(first);

    let mut second = daemon.accept().await;
    send(&mut second, "copy_to_clipboard\ntext\ttwo\ndone\n").await;
    assert_eq!(next_command(&mut commands).await.first_argument("text"), Some("two"));

    client.shutdown().await.expect("clean shutdown");
}

/// **VALUE**: Verifies that invalid builder settings are rejected before anything spawns.
#[tokio::test]
async fn given_zero_retry_interval_when_starting_then_validation_error() {
    let daemon = FakeDaemon::unbound();

    let result = HookClientBuilder::new()
        .with_socket_path(daemon.path())
        .with_retry_interval(Duration::ZERO)
        .start(DispatchTable::new());

    match result {
        Err(HooksError::Config(ConfigError::ValidationError { field, .. })) => {
            assert_eq!(field, "retry_interval");
        }
        Err(other) => panic!("expected ValidationError, got {other:?}"),
        Ok(_) => panic!("expected ValidationError, got a running client"),
    }
}

#[tokio::test]
async fn given_zero_max_arguments_when_starting_then_validation_error() {
    let daemon = FakeDaemon::unbound();

    let result = HookClientBuilder::new()
        .with_socket_path(daemon.path())
        .with_max_arguments(0)
        .start(DispatchTable::new());

    assert!(matches!(
        result,
        Err(HooksError::Config(ConfigError::ValidationError { .. }))
    ));
}

fn exploding_handler(_session: &SessionHandle, _command: &Command) {
    panic!("handler exploded");
}
