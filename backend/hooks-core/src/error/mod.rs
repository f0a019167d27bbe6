pub mod config;
pub mod connection;
pub mod handler;
pub mod protocol;

pub use config::ConfigError;
pub use connection::ConnectionError;
pub use handler::HandlerError;
pub use protocol::ProtocolError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HooksError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Handler(#[from] HandlerError),
}

impl HooksError {
    /// True when the failure came from the peer misbehaving rather than the transport.
    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, HooksError::Protocol(_))
    }
}
