use common::ErrorLocation;

use std::io::Error as IoError;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum HandlerError {
    #[error("Launch Error: {message} {location}")]
    Launch {
        message: String,
        location: ErrorLocation,
        #[source]
        source: IoError,
    },

    /// A handler panicked while running. The connection it ran on is torn down.
    #[error("Handler Panicked Error: '{command}': {message} {location}")]
    Panicked {
        command: String,
        message: String,
        location: ErrorLocation,
    },
}
