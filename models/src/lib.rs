//! Protocol data for the Dropbox hook socket.
//!
//! The daemon pushes commands to the client as a name line followed by
//! argument lines. This crate holds the parsed shape of those commands and
//! nothing else: no I/O, no parsing, no dispatch.

pub mod command;
pub mod error;

#[cfg(test)]
mod tests;

pub use command::arguments::Arguments;
pub use command::builder::CommandBuilder;
pub use command::Command;
pub use common::ErrorLocation;
pub use error::model_error::ModelError;
