use rspserial_frame::{DecoderStats, PayloadReader};
use tokio::io::AsyncRead;

use crate::codec::MessageCodec;
use crate::error::MessageReadError;
use crate::message::Message;

/// Async stream of decoded messages over a byte source.
pub struct MessageReader<R> {
    payloads: PayloadReader<R>,
    codec: MessageCodec,
}

impl<R: AsyncRead + Unpin> MessageReader<R> {
    pub fn new(inner: R, codec: MessageCodec) -> Self {
        Self {
            payloads: PayloadReader::new(inner),
            codec,
        }
    }

    /// Next message, or `None` at end of input.
    ///
    /// A payload that does not decode yields `Err(MessageReadError::Message)`
    /// and the following call continues with the next frame. Framing anomalies
    /// are skipped by the payload layer; only I/O failures end the stream.
    pub async fn next_message(&mut self) -> Result<Option<Message>, MessageReadError> {
        let Some(payload) = self.payloads.next_payload().await? else {
            return Ok(None);
        };
        Ok(Some(self.codec.decode_message(&payload)?))
    }

    pub fn codec(&self) -> &MessageCodec {
        &self.codec
    }

    pub fn stats(&self) -> &DecoderStats {
        self.payloads.stats()
    }

    pub fn get_ref(&self) -> &R {
        self.payloads.get_ref()
    }

    pub fn get_mut(&mut self) -> &mut R {
        self.payloads.get_mut()
    }

    pub fn into_inner(self) -> R {
        self.payloads.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MessageError;
    use crate::model::ModelMeta;

    fn reader(bytes: &'static [u8]) -> MessageReader<&'static [u8]> {
        MessageReader::new(bytes, MessageCodec::new(ModelMeta::rsp1570()))
    }

    async fn single_message(bytes: &'static [u8]) -> Message {
        let mut reader = reader(bytes);
        let message = reader.next_message().await.unwrap().unwrap();
        assert!(reader.next_message().await.unwrap().is_none());
        assert_eq!(reader.stats().anomalies(), 0);
        message
    }

    #[tokio::test]
    async fn feedback_from_wire() {
        let message = single_message(
            b"\xfe1\xa3 FIRE TV       VOL  64DOLBY PL\x19 C     48K  \x00F\x08\x00\xfc\xf2",
        )
        .await;
        let display = message.as_feedback().unwrap();
        assert_eq!(display.lines[0], "FIRE TV       VOL  64");
        assert_eq!(display.lines[1], "DOLBY PL\x19 C     48K  ");
        let state = display.parse_display_lines();
        assert_eq!(state.source_name.as_deref(), Some("FIRE TV"));
        assert_eq!(state.volume, Some(64));
    }

    #[tokio::test]
    async fn feedback_with_escaped_checksum() {
        let message = single_message(
            b"\xfe1\xa3 VIRE TV       VOL  60DOLBY PL\x19 C     48K  \x00F\x08\x00\xfc\xfd\x01",
        )
        .await;
        let display = message.as_feedback().unwrap();
        assert_eq!(display.lines[0], "VIRE TV       VOL  60");
        assert_eq!(display.icons_that_are_on().len(), 10);
    }

    #[tokio::test]
    async fn feedback_after_power_off() {
        let message = single_message(
            b"\xfe1\xa3 \x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\
              \x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\
              \x00\x00\x08\x00\x00\xfc",
        )
        .await;
        let display = message.as_feedback().unwrap();
        assert_eq!(display.icons_that_are_on(), ["Standby LED"]);
        assert_eq!(display.parse_display_lines().is_on, Some(false));
    }

    #[tokio::test]
    async fn trigger_from_wire() {
        let message = single_message(b"\xfe\x07\xa3\x21\x01\x01\x00\x00\x00\xcd").await;
        assert_eq!(
            message,
            Message::Trigger(crate::message::TriggerMessage { flags: [1, 1, 0, 0, 0] })
        );
    }

    #[tokio::test]
    async fn decode_error_does_not_end_stream() {
        // Unknown message type 0x99, then POWER_TOGGLE.
        let mut reader = reader(b"\xfe\x03\xa3\x99\x00\x3f\xfe\x03\xa3\x10\x0a\xc0");
        assert!(matches!(
            reader.next_message().await,
            Err(MessageReadError::Message(MessageError::UnknownMessageType(0x99)))
        ));
        let message = reader.next_message().await.unwrap().unwrap();
        assert_eq!(message.kind(), crate::message::MessageKind::Command);
        assert!(reader.next_message().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn framing_noise_is_skipped() {
        let mut reader = reader(b"junk\xfe\x03\xa3\x10\x0a\x00\xfe\x03\xa3\x10\x0a\xc0");
        let message = reader.next_message().await.unwrap().unwrap();
        assert_eq!(
            message,
            Message::Command(crate::message::CommandMessage::new(0x10, vec![0x0A]))
        );
        assert_eq!(reader.stats().checksum_errors, 1);
        assert_eq!(reader.stats().junk_runs, 1);
    }
}
