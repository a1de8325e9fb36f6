//! Byte-stuffed, checksummed framing for the Rotel RS-232 protocol.
//!
//! Every payload travels on the wire as:
//! - an unescaped start byte (`0xFE`)
//! - a count byte followed by `count` payload bytes
//! - a checksum byte (sum of count and payload, mod 256)
//!
//! Count, payload and checksum are escaped so that `0xFE` and `0xFD` never
//! appear literally inside a frame. The decoder resynchronises on the next
//! start byte after any framing error.

pub mod codec;
pub mod decoder;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{
    calculate_checksum, encode_payload, encode_payload_to_bytes, escape_into, hex, ESCAPE_BYTE,
    MAX_PAYLOAD, START_BYTE,
};
pub use decoder::{DecoderStats, PayloadCodec, PayloadDecoder};
pub use error::{FrameError, Result};
pub use reader::PayloadReader;
pub use writer::PayloadWriter;
