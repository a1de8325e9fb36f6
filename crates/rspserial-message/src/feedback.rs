use serde::Serialize;
use tracing::{warn, Level};

use crate::error::{MessageError, Result};
use crate::icons::{flags_to_icons, icons_that_are_on, Icon, FLAG_BYTES};
use crate::msgtype::MSGTYPE_FEEDBACK_STRING;

/// Characters per display line.
pub const LINE_LENGTH: usize = 21;
/// Data bytes in a feedback message: two display lines and the icon flags.
pub const FEEDBACK_DATA_LENGTH: usize = 2 * LINE_LENGTH + FLAG_BYTES;

const BLANK_LINE: &str = "\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0";
/// The front panel's single-cell "II" glyph, as in "DOLBY PLII".
const GLYPH_II: char = '\x19';

/// Contents of the front-panel display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackMessage {
    pub lines: [String; 2],
    pub flags: [u8; FLAG_BYTES],
}

/// What the display lines say about the device.
///
/// Line 2 is shared by several overlays (record source, zone status), so at
/// most one of the overlay fields is set and `info` always carries the raw text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DisplayState {
    pub is_on: Option<bool>,
    pub source_name: Option<String>,
    pub volume: Option<u8>,
    pub mute_on: Option<bool>,
    pub party_mode_on: Option<bool>,
    pub info: Option<String>,
    pub rec_source: Option<String>,
    pub zone2_source: Option<String>,
    pub zone2_volume: Option<u8>,
    pub zone3_source: Option<String>,
    pub zone3_volume: Option<u8>,
    pub zone4_source: Option<String>,
    pub zone4_volume: Option<u8>,
}

impl FeedbackMessage {
    pub fn new(line1: impl Into<String>, line2: impl Into<String>, flags: [u8; FLAG_BYTES]) -> Self {
        Self {
            lines: [line1.into(), line2.into()],
            flags,
        }
    }

    /// Interpret the data section of a feedback payload.
    pub fn from_data(data: &[u8]) -> Result<Self> {
        if data.len() != FEEDBACK_DATA_LENGTH {
            return Err(MessageError::InvalidLength {
                message_type: MSGTYPE_FEEDBACK_STRING,
                expected: FEEDBACK_DATA_LENGTH,
                actual: data.len(),
            });
        }
        let text = &data[..2 * LINE_LENGTH];
        if !text.is_ascii() {
            return Err(MessageError::InvalidText {
                message_type: MSGTYPE_FEEDBACK_STRING,
            });
        }
        let line = |range: std::ops::Range<usize>| text[range].iter().map(|&b| char::from(b)).collect::<String>();
        let mut flags = [0u8; FLAG_BYTES];
        flags.copy_from_slice(&data[2 * LINE_LENGTH..]);
        Ok(Self::new(line(0..LINE_LENGTH), line(LINE_LENGTH..2 * LINE_LENGTH), flags))
    }

    /// Wire form of the data section. Lines are padded or cut to the display width.
    pub fn to_data(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(FEEDBACK_DATA_LENGTH);
        for line in &self.lines {
            let bytes = line.as_bytes();
            let len = bytes.len().min(LINE_LENGTH);
            data.extend_from_slice(&bytes[..len]);
            data.resize(data.len() + LINE_LENGTH - len, b' ');
        }
        data.extend_from_slice(&self.flags);
        data
    }

    pub fn icons(&self) -> Vec<(&'static Icon, bool)> {
        flags_to_icons(&self.flags)
    }

    pub fn icons_that_are_on(&self) -> Vec<&'static str> {
        icons_that_are_on(&self.icons())
    }

    pub fn log(&self, level: Level) {
        log_at!(level, "Display line 1: '{}'", self.lines[0]);
        log_at!(level, "Display line 2: '{}'", self.lines[1]);
        log_at!(level, "Icons: {:?}", self.icons_that_are_on());
    }

    /// Infer as much device state as the two display lines allow.
    ///
    /// Source names are at most eight characters.
    pub fn parse_display_lines(&self) -> DisplayState {
        let mut state = DisplayState::default();

        let line1 = self.lines[0].as_str();
        if line1.len() != LINE_LENGTH {
            warn!(line = line1, "display line 1 must be exactly {LINE_LENGTH} bytes");
        }
        if line1 == BLANK_LINE {
            state.is_on = Some(false);
        } else {
            state.is_on = Some(true);
            state.source_name = Some(field(line1, 0, 8).trim_end().to_string());
            state.party_mode_on = Some(field(line1, 10, 13) == "pty");
            let vol_str = field(line1, 14, LINE_LENGTH);
            if vol_str == "MUTE ON" || vol_str == "       " {
                state.mute_on = Some(true);
            } else if let Some(level) = vol_str.strip_prefix("VOL") {
                state.mute_on = Some(false);
                state.volume = parse_number(level);
            } else {
                warn!(vol_str, "could not verify VOL string");
            }
        }

        let line2 = self.lines[1].as_str();
        if line2.len() != LINE_LENGTH {
            warn!(line = line2, "display line 2 must be exactly {LINE_LENGTH} bytes");
        }
        if line2 != BLANK_LINE {
            state.info = Some(line2.trim().replace(GLYPH_II, "II"));
            let overlay = field(line2, 0, 9);
            let source = || Some(field(line2, 9, LINE_LENGTH).trim_end().to_string());
            let volume = || parse_number(field(line2, 14, 16));
            match (overlay, field(line2, 0, 14)) {
                ("  REC    ", _) => state.rec_source = source(),
                ("  ZONE2  ", _) => state.zone2_source = source(),
                (_, "  ZONE2 VOL   ") => state.zone2_volume = volume(),
                ("  ZONE3  ", _) => state.zone3_source = source(),
                (_, "  ZONE3 VOL   ") => state.zone3_volume = volume(),
                ("  ZONE4  ", _) => state.zone4_source = source(),
                (_, "  ZONE4 VOL   ") => state.zone4_volume = volume(),
                _ => {}
            }
        }

        state
    }
}

/// `line[start..end]`, clamped to the line like a display column range.
fn field(line: &str, start: usize, end: usize) -> &str {
    let end = end.min(line.len());
    line.get(start.min(end)..end).unwrap_or("")
}

fn parse_number(text: &str) -> Option<u8> {
    match text.trim().parse() {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(text, %err, "could not parse volume");
            None
        }
    }
}
