//! Cross-thread visibility of the connected flag.
//!
//! Only the session task writes the flag, and only at the connect and
//! teardown transitions. Any number of threads may block until it reaches a
//! target value.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

#[derive(Debug, Default)]
pub(crate) struct ConnectionState {
    connected: Mutex<bool>,
    changed: Condvar,
}

impl ConnectionState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Publish a transition and wake every waiter.
    ///
    /// Returns the previous value.
    pub(crate) fn set_connected(&self, connected: bool) -> bool {
        let mut guard = self.lock();
        let previous = *guard;
        *guard = connected;
        self.changed.notify_all();
        previous
    }

    pub(crate) fn is_connected(&self) -> bool {
        *self.lock()
    }

    /// Block the calling thread until the flag equals `target`.
    pub(crate) fn wait_until(&self, target: bool) {
        let guard = self.lock();
        let _guard = self
            .changed
            .wait_while(guard, |connected| *connected != target)
            .unwrap_or_else(PoisonError::into_inner);
    }

    /// Like [`ConnectionState::wait_until`], giving up after `timeout`.
    ///
    /// Returns `true` if the flag reached `target`.
    pub(crate) fn wait_until_timeout(&self, target: bool, timeout: Duration) -> bool {
        let guard = self.lock();
        let (guard, _timed_out) = self
            .changed
            .wait_timeout_while(guard, timeout, |connected| *connected != target)
            .unwrap_or_else(PoisonError::into_inner);
        *guard == target
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        self.connected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
