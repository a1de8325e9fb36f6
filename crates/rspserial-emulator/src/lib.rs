//! Emulator of a Rotel RSP-1570/1572 processor.
//!
//! Listens on TCP, decodes commands and answers with feedback messages the
//! way the real device does: power on after a boot delay, a blinking display
//! while muted, and the configured source aliases on the display. Only the
//! most recently connected client receives feedback.

pub mod config;
pub mod device;
pub mod error;
pub mod server;

pub use config::{EmulatorConfig, DEFAULT_BLINK_INTERVAL, DEFAULT_PORT, DEFAULT_POWER_ON_DELAY};
pub use device::{Device, DeviceState, Outcome};
pub use error::{EmulatorError, Result};
pub use server::{Emulator, EmulatorHandle};
