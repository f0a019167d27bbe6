use crate::session_tests::helpers::{
    FakeDaemon, TEST_TIMEOUT, closed_by_client, forwarding_table, next_command, send,
    start_client, wait_connected,
};

use std::sync::atomic::Ordering;

use tokio::time::timeout;

/// **VALUE**: Verifies that a command written by the daemon reaches its handler with
/// decoded arguments.
///
/// **WHY THIS MATTERS**: This is the whole purpose of the client. If bytes on the real
/// socket never turn into handler calls, file emblems never refresh.
///
/// **BUG THIS CATCHES**: Would catch:
/// - Readiness events not driving the parser
/// - Commands split across writes never completing
/// - Escapes left undecoded on the way to the handler
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn given_connected_client_when_daemon_sends_command_then_handler_invoked() {
    // GIVEN: A connected client with a shell_touch handler
    let daemon = FakeDaemon::bind();
    let (table, mut commands) = forwarding_table(&["shell_touch"]);
    let (client, _disconnects) = start_client(&daemon, table);
    let mut stream = daemon.accept().await;
    assert!(wait_connected(&client.handle(), true).await);

    // WHEN: The daemon writes one command in two pieces
    send(&mut stream, "shell_touch\npath\t/home/u/Dropbox/My\\tFile").await;
    send(&mut stream, ".txt\ndone\n").await;

    // THEN: The handler sees the decoded path
    let command = next_command(&mut commands).await;
    assert_eq!(command.name(), "shell_touch");
    assert_eq!(
        command.first_argument("path"),
        Some("/home/u/Dropbox/My\tFile.txt")
    );

    client.shutdown().await.expect("clean shutdown");
}

/// **VALUE**: Verifies that an unknown command is skipped without dropping the connection.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn given_unknown_command_when_received_then_connection_kept() {
    // GIVEN: A connected client that only knows shell_touch
    let daemon = FakeDaemon::bind();
    let (table, mut commands) = forwarding_table(&["shell_touch"]);
    let (client, disconnects) = start_client(&daemon, table);
    let mut stream = daemon.accept().await;

    // WHEN: An unknown command precedes a known one on the same connection
    send(&mut stream, "foo\ndone\nshell_touch\npath\t/a\ndone\n").await;

    // THEN: The known command is dispatched and no teardown happened
    let command = next_command(&mut commands).await;
    assert_eq!(command.first_argument("path"), Some("/a"));
    assert_eq!(disconnects.load(Ordering::SeqCst), 0);
    assert!(client.handle().is_connected());

    client.shutdown().await.expect("clean shutdown");
}

/// **VALUE**: Verifies that a command with too many argument lines drops the connection
/// and that the client reconnects and keeps working.
///
/// **WHY THIS MATTERS**: A misbehaving peer must cost one connection, not the client.
///
/// **BUG THIS CATCHES**: Would catch:
/// - The oversized command being dispatched
/// - The client stopping instead of reconnecting
/// - Parser state from the bad connection leaking into the next one
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn given_too_many_arguments_when_received_then_reconnects_without_dispatch() {
    // GIVEN: A connected client
    let daemon = FakeDaemon::bind();
    let (table, mut commands) = forwarding_table(&["bulk", "shell_touch"]);
    let (client, disconnects) = start_client(&daemon, table);
    let mut first = daemon.accept().await;

    // WHEN: The daemon sends 21 argument lines
    let mut text = String::from("bulk\n");
    for index in 0..21 {
        text.push_str(&format!("key{index}\tvalue{index}\n"));
    }
    text.push_str("done\n");
    send(&mut first, &text).await;

    // THEN: The client hangs up and comes back on a fresh connection
    assert!(closed_by_client(&mut first).await);
    let mut second = daemon.accept().await;
    assert!(wait_connected(&client.handle(), true).await);
    assert_eq!(disconnects.load(Ordering::SeqCst), 1);

    // THEN: The new connection starts from a clean parser
    send(&mut second, "shell_touch\npath\t/after\ndone\n").await;
    let command = next_command(&mut commands).await;
    assert_eq!(command.name(), "shell_touch");
    assert!(commands.try_recv().is_err(), "bulk was never dispatched");

    client.shutdown().await.expect("clean shutdown");
}

/// **VALUE**: Verifies that exactly 20 argument lines are accepted end to end.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn given_twenty_arguments_when_received_then_dispatched() {
    let daemon = FakeDaemon::bind();
    let (table, mut commands) = forwarding_table(&["bulk"]);
    let (client, disconnects) = start_client(&daemon, table);
    let mut stream = daemon.accept().await;

    let mut text = String::from("bulk\n");
    for index in 0..20 {
        text.push_str(&format!("key{index}\tvalue{index}\n"));
    }
    text.push_str("done\n");
    send(&mut stream, &text).await;

    let command = next_command(&mut commands).await;
    assert_eq!(command.arguments().len(), 20);
    assert_eq!(disconnects.load(Ordering::SeqCst), 0);

    client.shutdown().await.expect("clean shutdown");
}

/// **VALUE**: Verifies that a malformed argument line drops the connection.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn given_malformed_argument_when_received_then_connection_dropped() {
    let daemon = FakeDaemon::bind();
    let (table, mut commands) = forwarding_table(&["shell_touch"]);
    let (client, _disconnects) = start_client(&daemon, table);
    let mut stream = daemon.accept().await;

    send(&mut stream, "shell_touch\nno-tab-here\ndone\n").await;

    assert!(closed_by_client(&mut stream).await);
    let _reconnected = daemon.accept().await;
    assert!(
        timeout(TEST_TIMEOUT / 50, commands.recv()).await.is_err(),
        "malformed command must not be dispatched"
    );

    client.shutdown().await.expect("clean shutdown");
}
