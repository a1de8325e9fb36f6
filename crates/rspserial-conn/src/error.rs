use std::time::Duration;

use rspserial_message::{MessageError, MessageReadError};

/// Errors from opening or using a connection.
#[derive(Debug, thiserror::Error)]
pub enum ConnError {
    /// `open` was called on a connection that is already open.
    #[error("connection is already open")]
    AlreadyOpen,

    /// The connection has not been opened yet.
    #[error("connection is not open")]
    NotOpen,

    /// The connection was closed and cannot be used again.
    #[error("connection is closed")]
    Closed,

    /// Opening the link failed.
    #[error("connection error: {0}")]
    Transport(#[from] rspserial_transport::TransportError),

    /// Reading or writing frames failed.
    #[error("frame error: {0}")]
    Frame(#[from] rspserial_frame::FrameError),

    /// A command could not be encoded.
    #[error("message error: {0}")]
    Message(#[from] MessageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Opening the link took too long.
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

impl From<MessageReadError> for ConnError {
    fn from(err: MessageReadError) -> Self {
        match err {
            MessageReadError::Frame(err) => ConnError::Frame(err),
            MessageReadError::Message(err) => ConnError::Message(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConnError>;

/// Errors from source alias discovery.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// The device did not answer a command with a usable feedback message.
    #[error("no feedback message received after {command}")]
    NoFeedback { command: String },

    /// The original source alias was not seen while cycling through sources.
    #[error("source alias '{alias}' was not found on the device")]
    UnknownAlias { alias: String },

    #[error(transparent)]
    Conn(#[from] ConnError),
}
