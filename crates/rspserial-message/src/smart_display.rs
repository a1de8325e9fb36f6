//! Smart-display pages sent by the RSP-1572 (iPod/USB browsing).

use tracing::{warn, Level};

use crate::error::{MessageError, Result};
use crate::msgtype::{MSGTYPE_SMART_DISPLAY_STRING_1, MSGTYPE_SMART_DISPLAY_STRING_2};

/// Characters per smart-display line.
pub const SMART_LINE_LENGTH: usize = 26;
/// Data bytes of a single-line message: two reserved bytes and one line.
pub const SMART_DISPLAY_1_LENGTH: usize = 2 + SMART_LINE_LENGTH;
/// Data bytes of a page message: nine lines.
pub const SMART_DISPLAY_2_LENGTH: usize = 9 * SMART_LINE_LENGTH;

/// Replacement for a line that is not valid text after glyph substitution.
pub const INVALID_LINE: &str = "INVALID LINE";

/// Private-use glyph bytes 0x80..=0x8C and the characters they draw.
const GLYPHS: [char; 13] = [
    '\u{24BB}', // circled F
    '\u{24C2}', // circled M
    '\u{24C9}', // circled T
    '\u{24C7}', // circled R
    '\u{24C8}', // circled S
    '\u{24B6}', // circled A
    '\u{2500}', // full bar
    '\u{23F5}', // play
    '\u{23F8}', // pause
    '\u{23F9}', // stop
    '\u{23F4}', // reverse
    '\u{21D2}', // cursor right
    '\u{21D0}', // cursor left
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmartDisplayMessage {
    pub lines: Vec<String>,
    /// Display line number of `lines[0]`.
    pub start: u8,
}

impl SmartDisplayMessage {
    pub fn from_data(message_type: u8, data: &[u8]) -> Result<Self> {
        match message_type {
            MSGTYPE_SMART_DISPLAY_STRING_1 => {
                expect_length(message_type, data, SMART_DISPLAY_1_LENGTH)?;
                if data[..2] != [0, 0] {
                    return Err(MessageError::Malformed {
                        message_type,
                        reason: format!("reserved bytes {:02X} {:02X} are not zero", data[0], data[1]),
                    });
                }
                Ok(Self {
                    lines: vec![decode_smart_display_line(&data[2..])],
                    start: 1,
                })
            }
            MSGTYPE_SMART_DISPLAY_STRING_2 => {
                expect_length(message_type, data, SMART_DISPLAY_2_LENGTH)?;
                Ok(Self {
                    lines: data
                        .chunks(SMART_LINE_LENGTH)
                        .map(decode_smart_display_line)
                        .collect(),
                    start: 2,
                })
            }
            other => Err(MessageError::UnknownMessageType(other)),
        }
    }

    pub fn log(&self, level: Level) {
        for (lineno, line) in (usize::from(self.start)..).zip(&self.lines) {
            log_at!(level, "Display line {lineno}: '{line}'");
        }
    }
}

fn expect_length(message_type: u8, data: &[u8], expected: usize) -> Result<()> {
    if data.len() == expected {
        Ok(())
    } else {
        Err(MessageError::InvalidLength {
            message_type,
            expected,
            actual: data.len(),
        })
    }
}

/// Decode one smart-display line.
///
/// Glyph bytes become their Unicode equivalents; the remaining bytes must be
/// UTF-8. Trailing whitespace is dropped.
pub fn decode_smart_display_line(line: &[u8]) -> String {
    let mut bytes = Vec::with_capacity(line.len() * 3);
    let mut buf = [0u8; 4];
    for &b in line {
        match b.checked_sub(0x80).and_then(|i| GLYPHS.get(usize::from(i))) {
            Some(glyph) => bytes.extend_from_slice(glyph.encode_utf8(&mut buf).as_bytes()),
            None => bytes.push(b),
        }
    }
    match String::from_utf8(bytes) {
        Ok(text) => text.trim_end().to_string(),
        Err(err) => {
            warn!(line = ?err.as_bytes(), "error decoding smart display line");
            INVALID_LINE.to_string()
        }
    }
}
