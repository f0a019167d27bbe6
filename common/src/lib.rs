//! Shared building blocks for the Dropbox hook client.
//!
//! Every crate in the workspace reports failures with a call-site
//! [`ErrorLocation`] so log lines point at the code that raised them.
//!
//! ## Architecture
//!
//! - **common** (this crate): cross-cutting primitives
//! - **models**: pure protocol data (commands and their arguments)
//! - **hooks-core**: connection, parsing and dispatch
//! - **hooks-agent**: host binary wiring everything together

pub mod error;


pub use error::error_location::ErrorLocation;
