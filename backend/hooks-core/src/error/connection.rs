use common::ErrorLocation;

use std::io::Error as IoError;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ConnectionError {
    #[error("Socket Path Error: {message} {location}")]
    SocketPath {
        message: String,
        location: ErrorLocation,
    },

    #[error("Connect Error: {message} {location}")]
    Connect {
        message: String,
        location: ErrorLocation,
        #[source]
        source: IoError,
    },

    #[error("Read Error: {message} {location}")]
    Read {
        message: String,
        location: ErrorLocation,
        #[source]
        source: IoError,
    },

    #[error("Peer Closed Error: {message} {location}")]
    PeerClosed {
        message: String,
        location: ErrorLocation,
    },

    #[error("Stopped Error: {message} {location}")]
    Stopped {
        message: String,
        location: ErrorLocation,
    },
}
