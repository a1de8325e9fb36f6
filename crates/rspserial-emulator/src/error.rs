/// Errors from running the emulator.
#[derive(Debug, thiserror::Error)]
pub enum EmulatorError {
    /// Binding or accepting on the listen socket failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A feedback frame could not be built.
    #[error("message error: {0}")]
    Message(#[from] rspserial_message::MessageError),

    /// An alias was given for a source the model does not have.
    #[error("unknown source '{0}'")]
    UnknownSource(String),
}

pub type Result<T> = std::result::Result<T, EmulatorError>;
