use hooks_core::error::HooksError;

use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error;

/// Errors surfaced by the agent binary.
///
/// Failures inside the hook client keep their own type and location in the
/// message; the wrapper records where the agent observed them.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Error from this app
    #[error("Agent Error: {message} {location}")]
    Agent {
        message: String,
        location: ErrorLocation,
    },

    /// Error from hooks-core (config, session start, shutdown)
    #[error("Core Error: {message} {location}")]
    Core {
        message: String,
        location: ErrorLocation,
    },

    /// Config or log directory could not be determined or created
    #[error("Paths Error: {message} {location}")]
    Paths {
        message: String,
        location: ErrorLocation,
    },
}

impl From<HooksError> for AgentError {
    #[track_caller]
    fn from(error: HooksError) -> Self {
        AgentError::Core {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
