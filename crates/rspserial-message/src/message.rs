use std::fmt;

use bytes::Bytes;
use serde::Serialize;
use tracing::Level;

use crate::error::{MessageError, Result};
use crate::feedback::FeedbackMessage;
use crate::msgtype::MSGTYPE_TRIGGER_STATUS_STRING;
use crate::smart_display::SmartDisplayMessage;

/// Data bytes in a trigger status message.
pub const TRIGGER_DATA_LENGTH: usize = 5;

const TRIGGER_GROUPS: [&str; TRIGGER_DATA_LENGTH] = ["All", "Main", "Zone 2", "Zone 3", "Zone 4"];
const TRIGGERS_PER_GROUP: usize = 6;

/// A decoded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Feedback(FeedbackMessage),
    Trigger(TriggerMessage),
    Command(CommandMessage),
    SmartDisplay(SmartDisplayMessage),
}

/// Discriminant of a [`Message`], for filtering and output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Feedback,
    Trigger,
    Command,
    SmartDisplay,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MessageKind::Feedback => "feedback",
            MessageKind::Trigger => "trigger",
            MessageKind::Command => "command",
            MessageKind::SmartDisplay => "smart_display",
        })
    }
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Feedback(_) => MessageKind::Feedback,
            Message::Trigger(_) => MessageKind::Trigger,
            Message::Command(_) => MessageKind::Command,
            Message::SmartDisplay(_) => MessageKind::SmartDisplay,
        }
    }

    pub fn as_feedback(&self) -> Option<&FeedbackMessage> {
        match self {
            Message::Feedback(feedback) => Some(feedback),
            _ => None,
        }
    }

    pub fn log(&self, level: Level) {
        match self {
            Message::Feedback(m) => m.log(level),
            Message::Trigger(m) => m.log(level),
            Message::Command(m) => m.log(level),
            Message::SmartDisplay(m) => m.log(level),
        }
    }
}

impl From<FeedbackMessage> for Message {
    fn from(m: FeedbackMessage) -> Self {
        Message::Feedback(m)
    }
}

impl From<TriggerMessage> for Message {
    fn from(m: TriggerMessage) -> Self {
        Message::Trigger(m)
    }
}

impl From<CommandMessage> for Message {
    fn from(m: CommandMessage) -> Self {
        Message::Command(m)
    }
}

impl From<SmartDisplayMessage> for Message {
    fn from(m: SmartDisplayMessage) -> Self {
        Message::SmartDisplay(m)
    }
}

/// State of the 12V trigger outputs, one byte per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerMessage {
    pub flags: [u8; TRIGGER_DATA_LENGTH],
}

/// On/off state of one trigger group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriggerGroup {
    pub name: &'static str,
    pub triggers: [bool; TRIGGERS_PER_GROUP],
}

impl TriggerMessage {
    pub fn from_data(data: &[u8]) -> Result<Self> {
        let flags = data.try_into().map_err(|_| MessageError::InvalidLength {
            message_type: MSGTYPE_TRIGGER_STATUS_STRING,
            expected: TRIGGER_DATA_LENGTH,
            actual: data.len(),
        })?;
        Ok(Self { flags })
    }

    /// Groups All, Main, Zone 2..4, each with triggers 1..6 (bits 0x01..0x20).
    pub fn flags_to_list(&self) -> Vec<TriggerGroup> {
        TRIGGER_GROUPS
            .iter()
            .zip(self.flags)
            .map(|(&name, flag)| TriggerGroup {
                name,
                triggers: std::array::from_fn(|bit| flag & (1 << bit) != 0),
            })
            .collect()
    }

    pub fn log(&self, level: Level) {
        log_at!(level, "{self}");
    }
}

impl fmt::Display for TriggerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, group) in self.flags_to_list().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: [", group.name)?;
            for (j, on) in group.triggers.iter().enumerate() {
                if j > 0 {
                    f.write_str(" ")?;
                }
                f.write_str(if *on { "on" } else { "off" })?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

/// A command as it appears on the bus, e.g. echoed by another controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandMessage {
    pub message_type: u8,
    pub key: Bytes,
}

impl CommandMessage {
    pub fn new(message_type: u8, key: impl Into<Bytes>) -> Self {
        Self {
            message_type,
            key: key.into(),
        }
    }

    pub fn log(&self, level: Level) {
        log_at!(
            level,
            "Command Message: message_type={:#04X}, key={}",
            self.message_type,
            rspserial_frame::hex(&self.key)
        );
    }
}
