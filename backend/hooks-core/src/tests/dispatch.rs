use crate::dispatch::DispatchTable;
use crate::session::SessionHandle;
use crate::tests::support::detached_session;

use models::{Arguments, Command};

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn counting(counter: &Arc<AtomicUsize>) -> impl Fn(&SessionHandle, &Command) + Send + Sync + 'static {
    let counter = Arc::clone(counter);
    move |_session: &SessionHandle, _command: &Command| {
        counter.fetch_add(1, Ordering::SeqCst);
    }
}

/// **VALUE**: Verifies that a later registration replaces an earlier one for the same name.
///
/// **WHY THIS MATTERS**: Hosts override built-in handlers by registering after them.
///
/// **BUG THIS CATCHES**: Would catch both handlers running, or the first one winning.
#[test]
fn given_two_registrations_for_same_name_when_dispatching_then_last_wins() {
    // GIVEN: Two handlers registered for "shell_touch"
    let (session, _commands) = detached_session();
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));
    let mut table = DispatchTable::new();
    table
        .register("shell_touch", counting(&first))
        .register("shell_touch", counting(&second));

    // WHEN: Dispatching once
    let handled = table.dispatch(&session, &Command::new("shell_touch", Arguments::new()));

    // THEN: Only the second handler ran
    assert!(handled);
    assert_eq!(first.load(Ordering::SeqCst), 0);
    assert_eq!(second.load(Ordering::SeqCst), 1);
    assert_eq!(table.len(), 1);
}

/// **VALUE**: Verifies that unknown commands are reported as unhandled and run nothing.
#[test]
fn given_unknown_command_when_dispatching_then_returns_false() {
    // GIVEN: A table with one handler
    let (session, _commands) = detached_session();
    let calls = Arc::new(AtomicUsize::new(0));
    let mut table = DispatchTable::new();
    table.register("launch_url", counting(&calls));

    // WHEN: Dispatching a different name
    let handled = table.dispatch(&session, &Command::new("foo", Arguments::new()));

    // THEN: Ignored
    assert!(!handled);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(table.contains("launch_url"));
    assert!(!table.contains("foo"));
}

/// **VALUE**: Verifies that Debug lists handler names in a stable order.
#[test]
fn given_table_with_handlers_when_formatting_debug_then_names_are_sorted() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut table = DispatchTable::new();
    table
        .register("shell_touch", counting(&calls))
        .register("copy_to_clipboard", counting(&calls));

    let rendered = format!("{table:?}");

    assert_eq!(
        rendered,
        r#"DispatchTable { handlers: ["copy_to_clipboard", "shell_touch"] }"#
    );
}

#[test]
fn given_new_table_when_created_then_is_empty() {
    let table = DispatchTable::new();
    assert!(table.is_empty());
    assert_eq!(table.len(), 0);
}
