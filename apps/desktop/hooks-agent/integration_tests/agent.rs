use hooks_agent::build_dispatch_table;
use hooks_agent::collaborators::LoggingDesktop;

use hooks_core::HookClientBuilder;
use hooks_core::config::HooksConfig;
use hooks_core::handlers::{COPY_TO_CLIPBOARD, LAUNCH_FOLDER, LAUNCH_URL, SHELL_TOUCH};

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio::io::AsyncWriteExt;
use tokio::net::UnixListener;
use tokio::time::{sleep, timeout};

const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// **VALUE**: Verifies that the agent wires every built-in hook.
#[test]
fn given_default_config_when_building_table_then_all_builtin_hooks_registered() {
    let table = build_dispatch_table(&HooksConfig::default(), Arc::new(LoggingDesktop::new()));

    for name in [SHELL_TOUCH, COPY_TO_CLIPBOARD, LAUNCH_URL, LAUNCH_FOLDER] {
        assert!(table.contains(name), "{name} missing");
    }
}

/// **VALUE**: Verifies the agent's table end to end: config on disk, a real socket, and a
/// clipboard command landing in the desktop collaborator.
///
/// **WHY THIS MATTERS**: This is the path the binary takes at startup. A mismatch between
/// the config file's socket override and the builder would leave the agent connected to
/// nothing.
///
/// **BUG THIS CATCHES**: Would catch:
/// - `with_config` ignoring `connection.socket_path`
/// - The clipboard handler not wired to the agent's collaborator
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn given_config_with_socket_override_when_daemon_sends_clipboard_then_desktop_updated() {
    // GIVEN: A listening fake daemon and a saved config pointing at it
    let dir = TempDir::new().expect("temp dir");
    let socket_path = dir.path().join("iface_socket");
    let listener = UnixListener::bind(&socket_path).expect("bind hook socket");

    let mut config = HooksConfig::default();
    config.connection.socket_path = Some(socket_path.display().to_string());
    config.connection.retry_interval_ms = 50;
    config.save(&dir.path().join("config")).expect("save config");
    let config = HooksConfig::load(&dir.path().join("config")).expect("load config");

    // GIVEN: The agent's table and a started client
    let desktop = Arc::new(LoggingDesktop::new());
    let table = build_dispatch_table(&config, Arc::clone(&desktop));
    let client = HookClientBuilder::new()
        .with_config(&config)
        .start(table)
        .expect("client starts");
    assert_eq!(client.socket_path(), socket_path.as_path());

    // WHEN: The daemon sends copy_to_clipboard
    let (mut stream, _) = timeout(TEST_TIMEOUT, listener.accept())
        .await
        .expect("client connected in time")
        .expect("accept");
    stream
        .write_all(b"copy_to_clipboard\ntext\thttps://db.tt/shared\ndone\n")
        .await
        .expect("write command");

    // THEN: The desktop collaborator holds the text
    let received = timeout(TEST_TIMEOUT, async {
        loop {
            if let Some(text) = desktop.clipboard_text() {
                return text;
            }
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("clipboard set in time");
    assert_eq!(received, "https://db.tt/shared");

    client.shutdown().await.expect("clean shutdown");
}
