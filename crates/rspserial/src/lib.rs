//! Rotel RSP-1570/1572 RS-232 protocol.
//!
//! # Crate Structure
//!
//! - [`transport`]: opens the link (serial device or `socket://host:port`)
//! - [`frame`]: byte-stuffed, checksummed frames
//! - [`message`]: device messages, model command tables, display parsing
//! - [`conn`]: shared connections, command correlation and source discovery
//! - [`emulator`]: a TCP device emulator (behind the `emulator` feature)

/// Re-export transport types.
pub mod transport {
    pub use rspserial_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use rspserial_frame::*;
}

/// Re-export message types.
pub mod message {
    pub use rspserial_message::*;
}

/// Re-export connection types.
pub mod conn {
    pub use rspserial_conn::*;
}

/// Re-export emulator types (requires `emulator` feature).
#[cfg(feature = "emulator")]
pub mod emulator {
    pub use rspserial_emulator::*;
}
