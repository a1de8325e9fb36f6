use bytes::Bytes;

use crate::codec::hex;

/// Errors that can occur during frame encoding/decoding.
///
/// Everything except [`FrameError::Io`] and [`FrameError::PayloadTooLarge`] is a
/// recoverable stream anomaly: the decoder reports it, drops the bytes involved
/// and carries on with the next start byte.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The payload does not fit in a one-byte count.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The trailing checksum byte does not match the frame contents.
    #[error("checksum mismatch (expected {expected:#04X}, got {actual:#04X}) in frame [{}]", hex(.frame))]
    ChecksumMismatch {
        expected: u8,
        actual: u8,
        frame: Bytes,
    },

    /// An escape byte was followed by something other than `0x00` or `0x01`.
    #[error("invalid byte {byte:#04X} after escape, discarded [{}]", hex(.discarded))]
    InvalidEscape { byte: u8, discarded: Bytes },

    /// A start byte arrived before the current frame was complete.
    #[error("start byte inside frame, discarded [{}]", hex(.discarded))]
    UnexpectedStart { discarded: Bytes },

    /// Bytes were skipped while looking for a start byte.
    #[error("skipped {count} bytes before start byte [{}]", hex(.sample))]
    Junk { count: usize, sample: Bytes },

    /// The stream ended in the middle of a frame.
    #[error("stream ended mid-frame, discarded [{}]", hex(.discarded))]
    Truncated { discarded: Bytes },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FrameError {
    /// Whether the decoder can skip past this error and keep going.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Io(_) | Self::PayloadTooLarge { .. })
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
