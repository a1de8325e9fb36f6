use std::fmt::Write as _;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Marks the beginning of a frame. Never escaped.
pub const START_BYTE: u8 = 0xFE;

/// Introduces a two-byte escape sequence inside a frame.
pub const ESCAPE_BYTE: u8 = 0xFD;

/// Largest payload a single count byte can describe.
pub const MAX_PAYLOAD: usize = u8::MAX as usize;

const ESCAPED_ESCAPE: u8 = 0x00;
const ESCAPED_START: u8 = 0x01;

/// Additive checksum, mod 256.
pub fn calculate_checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |sum, b| sum.wrapping_add(*b))
}

/// Append `bytes` to `dst`, replacing `0xFD` with `FD 00` and `0xFE` with `FD 01`.
pub fn escape_into(bytes: &[u8], dst: &mut BytesMut) {
    dst.reserve(bytes.len());
    for &b in bytes {
        match b {
            ESCAPE_BYTE => dst.put_slice(&[ESCAPE_BYTE, ESCAPED_ESCAPE]),
            START_BYTE => dst.put_slice(&[ESCAPE_BYTE, ESCAPED_START]),
            other => dst.put_u8(other),
        }
    }
}

/// Map the byte following an escape back to the literal it stands for.
pub(crate) fn unescape(byte: u8) -> Option<u8> {
    match byte {
        ESCAPED_ESCAPE => Some(ESCAPE_BYTE),
        ESCAPED_START => Some(START_BYTE),
        _ => None,
    }
}

/// Encode a payload into the wire format.
///
/// Wire format:
/// ```text
/// ┌────────┬───────────────────────────────────────────┐
/// │ 0xFE   │ escaped( count | payload | checksum )      │
/// └────────┴───────────────────────────────────────────┘
/// ```
/// The checksum covers the count byte and the payload.
pub fn encode_payload(payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if payload.len() > MAX_PAYLOAD {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD,
        });
    }

    let count = payload.len() as u8;
    let checksum = calculate_checksum(payload).wrapping_add(count);

    dst.reserve(2 * (payload.len() + 2) + 1);
    dst.put_u8(START_BYTE);
    escape_into(&[count], dst);
    escape_into(payload, dst);
    escape_into(&[checksum], dst);
    Ok(())
}

/// Encode a payload into a freshly allocated buffer.
pub fn encode_payload_to_bytes(payload: &[u8]) -> Result<Bytes> {
    let mut buf = BytesMut::new();
    encode_payload(payload, &mut buf)?;
    Ok(buf.freeze())
}

/// Render bytes as space separated upper-case hex, e.g. `FE 03 A3`.
pub fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{b:02X}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(payload: &[u8]) -> Vec<u8> {
        encode_payload_to_bytes(payload).unwrap().to_vec()
    }

    #[test]
    fn checksum_vectors() {
        assert_eq!(calculate_checksum(&[0x03, 0xA3, 0x10, 0x1E]), 0xD4);
        assert_eq!(calculate_checksum(&[0x03, 0xA3, 0x34, 0x30]), 0x0A);
        assert_eq!(calculate_checksum(&[]), 0x00);
    }

    #[test]
    fn checksum_wraps() {
        assert_eq!(calculate_checksum(&[0xFF, 0x02]), 0x01);
    }

    #[test]
    fn encode_power_toggle() {
        assert_eq!(encode(&[0xA3, 0x10, 0x0A]), [0xFE, 0x03, 0xA3, 0x10, 0x0A, 0xC0]);
    }

    #[test]
    fn encode_mute_toggle() {
        assert_eq!(encode(&[0xA3, 0x10, 0x1E]), [0xFE, 0x03, 0xA3, 0x10, 0x1E, 0xD4]);
    }

    #[test]
    fn checksum_escaped_as_start_byte() {
        // 03 + A3 + 30 + 28 = 0xFE
        assert_eq!(
            encode(&[0xA3, 0x30, 0x28]),
            [0xFE, 0x03, 0xA3, 0x30, 0x28, 0xFD, 0x01]
        );
    }

    #[test]
    fn checksum_escaped_as_escape_byte() {
        // 03 + A3 + 33 + 24 = 0xFD
        assert_eq!(
            encode(&[0xA3, 0x33, 0x24]),
            [0xFE, 0x03, 0xA3, 0x33, 0x24, 0xFD, 0x00]
        );
    }

    #[test]
    fn payload_bytes_are_escaped() {
        assert_eq!(
            encode(&[0xA3, 0x10, 0xFD]),
            [0xFE, 0x03, 0xA3, 0x10, 0xFD, 0x00, 0xB3]
        );
        assert_eq!(
            encode(&[0xA3, 0x10, 0xFE]),
            [0xFE, 0x03, 0xA3, 0x10, 0xFD, 0x01, 0xB4]
        );
    }

    #[test]
    fn count_byte_is_escaped() {
        let payload = vec![0x01; 0xFE];
        let wire = encode(&payload);
        assert_eq!(&wire[..3], &[START_BYTE, ESCAPE_BYTE, ESCAPED_START]);
    }

    #[test]
    fn only_leading_start_byte_is_literal() {
        let wire = encode(&[0xFE, 0xFD, 0xFE, 0xFD]);
        assert_eq!(wire[0], START_BYTE);
        assert!(!wire[1..].contains(&START_BYTE));
    }

    #[test]
    fn trailing_checksum_matches_unescaped_body() {
        for payload in [
            &[0xA3, 0x10, 0x0A][..],
            &[0xA3, 0x21, 0x01, 0x01, 0x00, 0x00, 0x00][..],
            &[0xA5, 0x14, 0x4B][..],
        ] {
            let wire = encode(payload);
            let body = &wire[1..wire.len() - 1];
            assert_eq!(calculate_checksum(body), *wire.last().unwrap());
        }
    }

    #[test]
    fn empty_payload() {
        assert_eq!(encode(&[]), [0xFE, 0x00, 0x00]);
    }

    #[test]
    fn rejects_oversized_payload() {
        let mut buf = BytesMut::new();
        let err = encode_payload(&[0u8; 256], &mut buf).unwrap_err();
        assert!(matches!(
            err,
            FrameError::PayloadTooLarge { size: 256, max: 255 }
        ));
        assert!(buf.is_empty());
    }

    #[test]
    fn hex_rendering() {
        assert_eq!(hex(&[0xFE, 0x03, 0x0A]), "FE 03 0A");
        assert_eq!(hex(&[]), "");
    }
}
