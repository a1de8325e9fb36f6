use std::sync::Arc;

use bytes::Bytes;
use rspserial_frame::encode_payload_to_bytes;
use tracing::trace;

use crate::error::{MessageError, Result};
use crate::feedback::FeedbackMessage;
use crate::message::{CommandMessage, Message, TriggerMessage};
use crate::model::{CommandCode, ModelMeta};
use crate::msgtype::{
    is_command_type, volume_direct_type, MSGTYPE_FEEDBACK_STRING, MSGTYPE_SMART_DISPLAY_STRING_1,
    MSGTYPE_SMART_DISPLAY_STRING_2, MSGTYPE_TRIGGER_STATUS_STRING,
};
use crate::smart_display::SmartDisplayMessage;

/// Volume-direct message type for a zone, 1 (main) to 4.
pub fn volume_direct_message_type(zone: u8) -> Result<u8> {
    volume_direct_type(zone).ok_or(MessageError::InvalidZone(zone))
}

/// Converts between command names, payloads and [`Message`]s for one model.
#[derive(Debug, Clone)]
pub struct MessageCodec {
    meta: Arc<ModelMeta>,
}

impl MessageCodec {
    pub fn new(meta: Arc<ModelMeta>) -> Self {
        Self { meta }
    }

    pub fn meta(&self) -> &Arc<ModelMeta> {
        &self.meta
    }

    /// Unframed payload for a named command.
    pub fn command_payload(&self, name: &str) -> Result<[u8; 3]> {
        let CommandCode { message_type, key } = self
            .meta
            .command(name)
            .ok_or_else(|| MessageError::UnknownCommand(name.to_string()))?;
        Ok([self.meta.device_id, message_type, key])
    }

    /// Unframed payload setting a zone's volume directly.
    pub fn volume_direct_payload(&self, zone: u8, volume: i32) -> Result<[u8; 3]> {
        let message_type = volume_direct_message_type(zone)?;
        let (min, max) = (self.meta.min_volume, self.meta.max_volume);
        let level = u8::try_from(volume)
            .ok()
            .filter(|v| (min..=max).contains(v))
            .ok_or(MessageError::VolumeOutOfRange { volume, min, max })?;
        Ok([self.meta.device_id, message_type, level])
    }

    /// Framed wire bytes for a named command.
    pub fn encode_command(&self, name: &str) -> Result<Bytes> {
        self.frame(&self.command_payload(name)?)
    }

    /// Framed wire bytes setting a zone's volume directly.
    pub fn encode_volume_direct_command(&self, zone: u8, volume: i32) -> Result<Bytes> {
        self.frame(&self.volume_direct_payload(zone, volume)?)
    }

    /// Framed feedback message as the device sends it.
    pub fn encode_feedback(&self, feedback: &FeedbackMessage) -> Result<Bytes> {
        let mut payload = vec![self.meta.device_id, MSGTYPE_FEEDBACK_STRING];
        payload.extend(feedback.to_data());
        self.frame(&payload)
    }

    fn frame(&self, payload: &[u8]) -> Result<Bytes> {
        encode_payload_to_bytes(payload).map_err(|err| MessageError::Encode(err.to_string()))
    }

    /// Interpret one unframed payload.
    pub fn decode_message(&self, payload: &[u8]) -> Result<Message> {
        let [device_id, message_type, data @ ..] = payload else {
            return Err(MessageError::PayloadTooShort(payload.len()));
        };
        if *device_id != self.meta.device_id {
            return Err(MessageError::DeviceIdMismatch {
                expected: self.meta.device_id,
                actual: *device_id,
            });
        }
        let message_type = *message_type;
        trace!(message_type, len = data.len(), "decoding message");
        let message = match message_type {
            MSGTYPE_FEEDBACK_STRING => FeedbackMessage::from_data(data)?.into(),
            MSGTYPE_TRIGGER_STATUS_STRING => TriggerMessage::from_data(data)?.into(),
            MSGTYPE_SMART_DISPLAY_STRING_1 | MSGTYPE_SMART_DISPLAY_STRING_2 => {
                SmartDisplayMessage::from_data(message_type, data)?.into()
            }
            t if is_command_type(t) => {
                if data.is_empty() {
                    return Err(MessageError::InvalidLength {
                        message_type,
                        expected: 1,
                        actual: 0,
                    });
                }
                CommandMessage::new(message_type, Bytes::copy_from_slice(data)).into()
            }
            other => return Err(MessageError::UnknownMessageType(other)),
        };
        Ok(message)
    }

    /// Name of the command with this type and key byte.
    pub fn command_name(&self, message_type: u8, key: u8) -> Option<&str> {
        self.meta.commands.name_of(CommandCode::new(message_type, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msgtype::{MSGTYPE_PRIMARY_COMMANDS, MSGTYPE_VOLUME_DIRECT_COMMANDS};

    fn codec() -> MessageCodec {
        MessageCodec::new(ModelMeta::rsp1570())
    }

    #[test]
    fn encodes_named_commands() {
        let codec = codec();
        assert_eq!(&codec.encode_command("POWER_TOGGLE").unwrap()[..], b"\xfe\x03\xa3\x10\x0a\xc0");
        assert_eq!(&codec.encode_command("POWER_ON").unwrap()[..], b"\xfe\x03\xa3\x10\x4b\x01");
        assert_eq!(
            &codec.encode_command("VOLUME_40").unwrap()[..],
            b"\xfe\x03\xa3\x30\x28\xfd\x01"
        );
    }

    #[test]
    fn unknown_command() {
        assert_eq!(
            codec().encode_command("MAKE_COFFEE"),
            Err(MessageError::UnknownCommand("MAKE_COFFEE".to_string()))
        );
    }

    #[test]
    fn volume_direct_bounds() {
        let codec = codec();
        assert_eq!(codec.volume_direct_payload(1, 0).unwrap(), [0xA3, 0x30, 0x00]);
        assert_eq!(codec.volume_direct_payload(3, 96).unwrap(), [0xA3, 0x33, 0x60]);
        assert_eq!(
            codec.volume_direct_payload(1, 97),
            Err(MessageError::VolumeOutOfRange { volume: 97, min: 0, max: 96 })
        );
        assert_eq!(
            codec.volume_direct_payload(2, -1),
            Err(MessageError::VolumeOutOfRange { volume: -1, min: 0, max: 96 })
        );
        assert_eq!(codec.volume_direct_payload(5, 10), Err(MessageError::InvalidZone(5)));
        assert_eq!(codec.volume_direct_payload(0, 10), Err(MessageError::InvalidZone(0)));
    }

    #[test]
    fn volume_direct_matches_named_command() {
        let codec = codec();
        assert_eq!(
            codec.encode_volume_direct_command(1, 40).unwrap(),
            codec.encode_command("VOLUME_40").unwrap()
        );
        assert_eq!(
            codec.encode_volume_direct_command(3, 36).unwrap(),
            codec.encode_command("ZONE_3_VOLUME_36").unwrap()
        );
    }

    #[test]
    fn decodes_command() {
        let message = codec().decode_message(&[0xA3, 0x10, 0x0A]).unwrap();
        assert_eq!(message, Message::Command(CommandMessage::new(MSGTYPE_PRIMARY_COMMANDS, vec![0x0A])));
        let message = codec().decode_message(&[0xA3, 0x30, 0x28]).unwrap();
        assert_eq!(
            message,
            Message::Command(CommandMessage::new(MSGTYPE_VOLUME_DIRECT_COMMANDS, vec![0x28]))
        );
    }

    #[test]
    fn decodes_trigger() {
        let message = codec().decode_message(&[0xA3, 0x21, 1, 1, 0, 0, 0]).unwrap();
        assert_eq!(message, Message::Trigger(TriggerMessage { flags: [1, 1, 0, 0, 0] }));
    }

    #[test]
    fn rejects_other_device() {
        assert_eq!(
            codec().decode_message(&[0xA5, 0x10, 0x0A]),
            Err(MessageError::DeviceIdMismatch { expected: 0xA3, actual: 0xA5 })
        );
    }

    #[test]
    fn rejects_unknown_type_and_short_payloads() {
        assert_eq!(
            codec().decode_message(&[0xA3, 0x99, 0x00]),
            Err(MessageError::UnknownMessageType(0x99))
        );
        assert_eq!(codec().decode_message(&[0xA3]), Err(MessageError::PayloadTooShort(1)));
        assert!(matches!(
            codec().decode_message(&[0xA3, 0x10]),
            Err(MessageError::InvalidLength { message_type: 0x10, .. })
        ));
    }

    #[test]
    fn feedback_round_trip() {
        let codec = codec();
        let feedback = FeedbackMessage::new(
            "CD ALIAS      VOL  50",
            "STEREO          44.1K",
            [0x01, 0x00, 0x08, 0x00, 0xA4],
        );
        let frame = codec.encode_feedback(&feedback).unwrap();
        assert_eq!(&frame[..4], b"\xfe\x31\xa3\x20");
        assert_eq!(&frame[frame.len() - 3..], b"\x00\xa4,");
        let mut decoder = rspserial_frame::PayloadDecoder::new();
        let payload = frame
            .iter()
            .find_map(|&b| decoder.push(b))
            .unwrap()
            .unwrap();
        assert_eq!(codec.decode_message(&payload).unwrap(), Message::Feedback(feedback));
    }

    #[test]
    fn reverse_lookup() {
        let codec = codec();
        assert_eq!(codec.command_name(0x10, 0x71), Some("POWER_OFF_ALL_ZONES"));
        assert_eq!(codec.command_name(0x17, 0x71), Some("ZONE_3_POWER_OFF_ALL_ZONES"));
        assert_eq!(codec.command_name(0x10, 0xEE), None);
    }
}
