//! Connection management for Rotel RSP-1570/1572 processors.
//!
//! [`AmpConnection`] owns one link. [`SharedConnection`] puts a background
//! reader on that link and fans every inbound message out to any number of
//! [`ClientConnection`]s, each with its own queue. Clients correlate replies
//! with commands by time window (`process_command`), and
//! [`discover_source_aliases`] builds on that to learn the names the device
//! shows for its inputs.

pub mod connection;
pub mod discovery;
pub mod error;
pub mod process;
pub mod shared;

pub use connection::{AmpConnection, AmpReader};
pub use discovery::{discover_source_aliases, discover_source_aliases_at, DiscoveryConfig};
pub use error::{ConnError, DiscoveryError, Result};
pub use process::{CommandWindows, DEFAULT_TIME_WINDOW, POWER_ON_TIME_WINDOW};
pub use shared::{ClientConnection, ClientId, ClientItem, SharedConnection};
