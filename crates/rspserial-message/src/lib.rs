//! Messages exchanged with Rotel RSP-1570 and RSP-1572 surround processors.
//!
//! A payload is `[device_id, message_type, data..]`. Controllers send
//! commands (a key byte, or a level for volume-direct types); the device
//! answers with feedback messages that mirror its front-panel display, plus
//! trigger status and, on the RSP-1572, smart-display pages.
//!
//! [`ModelMeta`] holds the per-model command table. [`MessageCodec`] turns
//! command names into framed bytes and payloads into [`Message`]s.

/// `tracing` event at a level chosen at runtime.
macro_rules! log_at {
    ($level:expr, $($arg:tt)+) => {
        let level: ::tracing::Level = $level;
        if level == ::tracing::Level::ERROR {
            ::tracing::error!($($arg)+)
        } else if level == ::tracing::Level::WARN {
            ::tracing::warn!($($arg)+)
        } else if level == ::tracing::Level::INFO {
            ::tracing::info!($($arg)+)
        } else if level == ::tracing::Level::DEBUG {
            ::tracing::debug!($($arg)+)
        } else {
            ::tracing::trace!($($arg)+)
        }
    };
}

pub mod codec;
pub mod error;
pub mod feedback;
pub mod icons;
pub mod message;
pub mod model;
pub mod msgtype;
pub mod reader;
pub mod smart_display;
mod tables;

pub use codec::{volume_direct_message_type, MessageCodec};
pub use error::{MessageError, MessageReadError, Result};
pub use feedback::{DisplayState, FeedbackMessage};
pub use icons::{
    flags_to_icons, icon_by_label, icon_list_to_flags, icons_that_are_on, Icon, IconCategory,
    ICONS,
};
pub use message::{CommandMessage, Message, MessageKind, TriggerGroup, TriggerMessage};
pub use model::{
    CommandCode, CommandTable, ModelConfig, ModelMeta, SourceMeta, INITIAL_SOURCE,
    INITIAL_VOLUME,
};
pub use msgtype::*;
pub use reader::MessageReader;
pub use smart_display::{decode_smart_display_line, SmartDisplayMessage, INVALID_LINE};
