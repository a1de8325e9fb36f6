//! Transport layer for talking to a Rotel RSP-1570/1572 processor.
//!
//! Two physical links are supported:
//! - a local serial device (Unix tty, raw 8N1), the way the processor is normally wired
//! - a TCP socket (`socket://host:port`), for serial-over-network bridges and the emulator
//!
//! Everything above this crate only sees an [`AmpStream`], which is `AsyncRead + AsyncWrite`.

pub mod endpoint;
pub mod error;
pub mod stream;

#[cfg(unix)]
pub mod serial;

pub use endpoint::{default_serial_port, ConnectOptions, Endpoint, DEFAULT_BAUD_RATE};
pub use error::{Result, TransportError};
pub use stream::{connect, AmpStream};

#[cfg(unix)]
pub use serial::SerialPort;
