//! Client side of the Dropbox hook socket.
//!
//! The daemon pushes commands over `<home>/.dropbox/iface_socket`. This crate
//! keeps one connection to that socket alive, parses the line protocol as
//! bytes arrive, and dispatches each command to a registered handler.
//!
//! ```no_run
//! use hooks_core::{DispatchTable, HookClientBuilder, SessionHandle};
//! use models::Command;
//!
//! # async fn run() -> Result<(), hooks_core::error::HooksError> {
//! let mut table = DispatchTable::new();
//! table.register("shell_touch", |_session: &SessionHandle, command: &Command| {
//!     log::info!("touched {:?}", command.first_argument("path"));
//! });
//!
//! let client = HookClientBuilder::new().start(table)?;
//! client.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod protocol;
pub mod session;

#[cfg(test)]
mod tests;

pub use dispatch::{CommandHandler, DispatchTable};
pub use session::{HookClient, HookClientBuilder, SessionHandle};
