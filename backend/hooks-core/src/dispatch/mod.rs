//! Command name → handler table.
//!
//! Built once during setup and moved into the session when the client starts,
//! after which nothing can register into it. Lookups happen on the session
//! task only.

use crate::session::SessionHandle;

use models::Command;

use std::collections::HashMap;
use std::fmt::{Debug, Formatter, Result as FormatResult};
use std::sync::Arc;

use log::{debug, trace};

/// A hook command handler.
///
/// Runs synchronously on the session task inside the readiness callback, so it
/// must not block: no waiting on [`SessionHandle::wait_until_connected`], no
/// blocking I/O, no long-running work.
pub trait CommandHandler: Send + Sync {
    fn handle(&self, session: &SessionHandle, command: &Command);
}

impl<F> CommandHandler for F
where
    F: Fn(&SessionHandle, &Command) + Send + Sync,
{
    fn handle(&self, session: &SessionHandle, command: &Command) {
        self(session, command)
    }
}

#[derive(Clone, Default)]
pub struct DispatchTable {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
}

impl DispatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `name`. A later registration for the same name wins.
    pub fn register<H>(&mut self, name: impl Into<String>, handler: H) -> &mut Self
    where
        H: CommandHandler + 'static,
    {
        let name = name.into();
        if self.handlers.insert(name.clone(), Arc::new(handler)).is_some() {
            debug!("Replaced hook handler for '{name}'");
        }
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Invoke the handler registered for `command`, if any.
    ///
    /// Returns `false` for unknown commands, which are ignored so newer daemons
    /// can send commands this client does not understand.
    pub fn dispatch(&self, session: &SessionHandle, command: &Command) -> bool {
        match self.handlers.get(command.name()) {
            Some(handler) => {
                trace!(
                    "Dispatching hook '{}' with {} argument key(s)",
                    command.name(),
                    command.arguments().len()
                );
                handler.handle(session, command);
                true
            }
            None => {
                debug!("Ignoring unknown hook command '{}'", command.name());
                false
            }
        }
    }
}

impl Debug for DispatchTable {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        formatter
            .debug_struct("DispatchTable")
            .field("handlers", &names)
            .finish()
    }
}
