use common::ErrorLocation;

use thiserror::Error as ThisError;

/// Peer misbehaviour. Always fatal to the connection, never to the process.
#[derive(Debug, ThisError)]
pub enum ProtocolError {
    #[error("Too Many Arguments Error: more than {limit} argument lines {location}")]
    TooManyArguments {
        limit: usize,
        location: ErrorLocation,
    },

    #[error("Malformed Argument Error: {line:?} {location}")]
    MalformedArgument {
        line: String,
        location: ErrorLocation,
    },

    #[error("Line Too Long Error: more than {limit} bytes without a newline {location}")]
    LineTooLong {
        limit: usize,
        location: ErrorLocation,
    },

    #[error("Invalid Encoding Error: {message} {location}")]
    InvalidEncoding {
        message: String,
        location: ErrorLocation,
    },
}
