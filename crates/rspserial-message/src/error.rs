/// Errors raised while encoding commands or interpreting payloads.
///
/// `Clone` so that one decode failure can be handed to every subscriber of a
/// shared connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageError {
    /// The payload is too short to hold a device ID and message type.
    #[error("payload too short ({0} bytes)")]
    PayloadTooShort(usize),

    /// The payload came from a different model than the one configured.
    #[error("didn't get expected device ID byte ({actual:#04X} != {expected:#04X})")]
    DeviceIdMismatch { expected: u8, actual: u8 },

    /// A display line that should be plain ASCII is not.
    #[error("message type {message_type:#04X} carries non-ASCII display text")]
    InvalidText { message_type: u8 },

    /// The message type byte is not one this codec understands.
    #[error("unknown message type byte {0:#04X}")]
    UnknownMessageType(u8),

    /// The data section has the wrong size for its message type.
    #[error("message type {message_type:#04X} expects {expected} data bytes, got {actual}")]
    InvalidLength {
        message_type: u8,
        expected: usize,
        actual: usize,
    },

    /// The data section has the right size but unexpected content.
    #[error("malformed message type {message_type:#04X}: {reason}")]
    Malformed { message_type: u8, reason: String },

    /// The command name is not in the model's command table.
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    /// Zones are numbered 1 (main) to 4.
    #[error("invalid zone: {0}")]
    InvalidZone(u8),

    /// Volume outside the model's inclusive bounds.
    #[error("volume out of range: {volume} (allowed {min}..={max})")]
    VolumeOutOfRange { volume: i32, min: u8, max: u8 },

    /// An icon label that is not on the front panel.
    #[error("unknown display icon '{0}'")]
    UnknownIcon(String),

    /// A model description could not be loaded or failed validation.
    #[error("invalid model configuration: {0}")]
    Config(String),

    /// A payload could not be framed.
    #[error("encode failed: {0}")]
    Encode(String),
}

pub type Result<T> = std::result::Result<T, MessageError>;

/// Errors from reading a message stream.
#[derive(Debug, thiserror::Error)]
pub enum MessageReadError {
    /// The underlying byte stream failed. The stream is finished.
    #[error(transparent)]
    Frame(#[from] rspserial_frame::FrameError),

    /// One payload could not be interpreted. The stream can be read further.
    #[error(transparent)]
    Message(#[from] MessageError),
}
