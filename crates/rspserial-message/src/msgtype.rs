//! Message type bytes (second byte of every payload).

pub const MSGTYPE_PRIMARY_COMMANDS: u8 = 0x10;
/// RSP-1572 only.
pub const MSGTYPE_PRIMARY_KEY_RELEASED_COMMANDS: u8 = 0x11;
pub const MSGTYPE_MAIN_ZONE_COMMANDS: u8 = 0x14;
pub const MSGTYPE_RECORD_SOURCE_COMMANDS: u8 = 0x15;
pub const MSGTYPE_ZONE_2_COMMANDS: u8 = 0x16;
pub const MSGTYPE_ZONE_3_COMMANDS: u8 = 0x17;
pub const MSGTYPE_ZONE_4_COMMANDS: u8 = 0x18;
pub const MSGTYPE_FEEDBACK_STRING: u8 = 0x20;
pub const MSGTYPE_TRIGGER_STATUS_STRING: u8 = 0x21;
/// RSP-1572 only.
pub const MSGTYPE_SMART_DISPLAY_STRING_1: u8 = 0x22;
/// RSP-1572 only.
pub const MSGTYPE_SMART_DISPLAY_STRING_2: u8 = 0x23;
pub const MSGTYPE_VOLUME_DIRECT_COMMANDS: u8 = 0x30;
pub const MSGTYPE_ZONE_2_VOLUME_DIRECT_COMMANDS: u8 = 0x32;
pub const MSGTYPE_ZONE_3_VOLUME_DIRECT_COMMANDS: u8 = 0x33;
pub const MSGTYPE_ZONE_4_VOLUME_DIRECT_COMMANDS: u8 = 0x34;
pub const MSGTYPE_TRIGGER_DIRECT_COMMANDS: u8 = 0x40;

/// Volume-direct message types, indexed by zone - 1.
pub const VOLUME_DIRECT_TYPES: [u8; 4] = [
    MSGTYPE_VOLUME_DIRECT_COMMANDS,
    MSGTYPE_ZONE_2_VOLUME_DIRECT_COMMANDS,
    MSGTYPE_ZONE_3_VOLUME_DIRECT_COMMANDS,
    MSGTYPE_ZONE_4_VOLUME_DIRECT_COMMANDS,
];

/// Whether payloads of this type carry a command as sent (key press, volume, trigger).
pub fn is_command_type(message_type: u8) -> bool {
    matches!(
        message_type,
        MSGTYPE_PRIMARY_COMMANDS
            | MSGTYPE_PRIMARY_KEY_RELEASED_COMMANDS
            | MSGTYPE_MAIN_ZONE_COMMANDS
            | MSGTYPE_RECORD_SOURCE_COMMANDS
            | MSGTYPE_ZONE_2_COMMANDS
            | MSGTYPE_ZONE_3_COMMANDS
            | MSGTYPE_ZONE_4_COMMANDS
            | MSGTYPE_VOLUME_DIRECT_COMMANDS
            | MSGTYPE_ZONE_2_VOLUME_DIRECT_COMMANDS
            | MSGTYPE_ZONE_3_VOLUME_DIRECT_COMMANDS
            | MSGTYPE_ZONE_4_VOLUME_DIRECT_COMMANDS
            | MSGTYPE_TRIGGER_DIRECT_COMMANDS
    )
}

/// Whether this is one of the four volume-direct types.
pub fn is_volume_direct_type(message_type: u8) -> bool {
    VOLUME_DIRECT_TYPES.contains(&message_type)
}

/// Volume-direct message type for a zone (1 = main, 2..4 = zones).
pub fn volume_direct_type(zone: u8) -> Option<u8> {
    VOLUME_DIRECT_TYPES.get(usize::from(zone).checked_sub(1)?).copied()
}
