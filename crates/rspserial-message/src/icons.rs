//! Front-panel display icons and the feedback flag bits that drive them.

use serde::Serialize;

use crate::error::{MessageError, Result};

/// Number of flag bytes at the end of a feedback message.
pub const FLAG_BYTES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IconCategory {
    Input,
    SoundMode,
    State,
    Speaker,
    Misc,
}

/// One icon on the front-panel display.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Icon {
    pub name: &'static str,
    pub category: IconCategory,
    pub friendly_name: &'static str,
    /// Short label, unique across the table.
    pub label: &'static str,
    pub flag_index: usize,
    pub flag: u8,
}

impl Icon {
    pub fn is_set(&self, flags: &[u8; FLAG_BYTES]) -> bool {
        flags[self.flag_index] & self.flag != 0
    }
}

const fn icon(
    name: &'static str,
    category: IconCategory,
    friendly_name: &'static str,
    label: &'static str,
    flag_index: usize,
    flag: u8,
) -> Icon {
    Icon {
        name,
        category,
        friendly_name,
        label,
        flag_index,
        flag,
    }
}

use IconCategory::{Input, Misc, SoundMode, Speaker, State};

pub static ICONS: [Icon; 36] = [
    icon("rsp1570_input_analog", Input, "Analog", "A", 0, 0x01),
    icon("rsp1570_input_5", Input, "Input 5", "5", 0, 0x02),
    icon("rsp1570_input_4", Input, "Input 4", "4", 0, 0x04),
    icon("rsp1570_input_3", Input, "Input 3", "3", 0, 0x08),
    icon("rsp1570_input_2", Input, "Input 2", "2", 0, 0x10),
    icon("rsp1570_input_1", Input, "Input 1", "1", 0, 0x20),
    icon("rsp1570_input_coaxial", Input, "Coaxial", "Coaxial", 0, 0x40),
    icon("rsp1570_input_optical", Input, "Optical", "Optical", 0, 0x80),
    icon("rsp1570_sound_mode_x", SoundMode, "x", "x", 1, 0x01),
    icon("rsp1570_sound_mode_ii", SoundMode, "II", "II", 1, 0x02),
    icon("rsp1570_input_hdmi", Input, "HDMI", "HDMI", 1, 0x04),
    icon("rsp1570_sound_mode_ex", SoundMode, "EX", "EX", 1, 0x08),
    icon("rsp1570_sound_mode_es", SoundMode, "ES", "ES", 1, 0x10),
    icon("rsp1570_sound_mode_dts", SoundMode, "dts", "dts", 1, 0x20),
    icon("rsp1570_sound_mode_pro_logic", SoundMode, "Pro Logic", "Pro Logic", 1, 0x40),
    icon("rsp1570_sound_mode_dolby_digital", SoundMode, "Dolby Digital", "Dolby Digital", 1, 0x80),
    icon("rsp1570_state_display_mode0", State, "Display Mode 0", "Display Mode0", 2, 0x01),
    icon("rsp1570_state_display_mode1", State, "Display Mode 1", "Display Mode1", 2, 0x02),
    icon("rsp1570_state_zone2", State, "Zone 2", "Zone 2", 2, 0x04),
    icon("rsp1570_state_standby_led", State, "Standby LED", "Standby LED", 2, 0x08),
    icon("rsp1570_speaker_center_back", Speaker, "Center Back", "SB", 3, 0x01),
    icon("rsp1570_state_zone4", State, "Zone 4", "Zone 4", 3, 0x02),
    icon("rsp1570_state_zone3", State, "Zone 3", "Zone 3", 3, 0x04),
    icon("rsp1570_misc_lt", Misc, "Misc <", "<", 3, 0x08),
    icon("rsp1570_misc_gt", Misc, "Misc >", ">", 3, 0x10),
    icon("rsp1570_sound_mode_71", SoundMode, "7.1", "7.1", 3, 0x20),
    icon("rsp1570_sound_mode_51", SoundMode, "5.1", "5.1", 3, 0x40),
    icon("rsp1570_state_zone", State, "Zone", "Zone", 3, 0x80),
    icon("rsp1570_speaker_center_back_left", Speaker, "Center Back Left", "CBL", 4, 0x01),
    icon("rsp1570_speaker_center_back_right", Speaker, "Center Back Right", "CBR", 4, 0x02),
    icon("rsp1570_speaker_subwoofer", Speaker, "Subwoofer", "SW", 4, 0x04),
    icon("rsp1570_speaker_surround_right", Speaker, "Surround Right", "SR", 4, 0x08),
    icon("rsp1570_speaker_surround_left", Speaker, "Surround Left", "SL", 4, 0x10),
    icon("rsp1570_speaker_front_right", Speaker, "Front Right", "FR", 4, 0x20),
    icon("rsp1570_speaker_center", Speaker, "Center", "C", 4, 0x40),
    icon("rsp1570_speaker_front_left", Speaker, "Front Left", "FL", 4, 0x80),
];

pub fn icon_by_label(label: &str) -> Option<&'static Icon> {
    ICONS.iter().find(|icon| icon.label == label)
}

/// State of every icon, in table order.
pub fn flags_to_icons(flags: &[u8; FLAG_BYTES]) -> Vec<(&'static Icon, bool)> {
    ICONS.iter().map(|icon| (icon, icon.is_set(flags))).collect()
}

/// Flag bytes with exactly the given icons lit.
pub fn icon_list_to_flags<S: AsRef<str>>(labels: &[S]) -> Result<[u8; FLAG_BYTES]> {
    let mut flags = [0u8; FLAG_BYTES];
    for label in labels {
        let label = label.as_ref();
        let icon = icon_by_label(label).ok_or_else(|| MessageError::UnknownIcon(label.to_string()))?;
        flags[icon.flag_index] |= icon.flag;
    }
    Ok(flags)
}

/// Labels of the icons that are lit, in table order.
pub fn icons_that_are_on(icons: &[(&'static Icon, bool)]) -> Vec<&'static str> {
    icons
        .iter()
        .filter(|(_, on)| *on)
        .map(|(icon, _)| icon.label)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_unique() {
        for (i, a) in ICONS.iter().enumerate() {
            assert!(
                ICONS[i + 1..].iter().all(|b| b.label != a.label && b.name != a.name),
                "{}",
                a.label
            );
        }
    }

    #[test]
    fn every_flag_bit_is_used_once() {
        let mut seen = [0u8; FLAG_BYTES];
        for icon in &ICONS {
            assert_eq!(seen[icon.flag_index] & icon.flag, 0, "{}", icon.name);
            seen[icon.flag_index] |= icon.flag;
        }
        // Byte 2 only defines its low nibble.
        assert_eq!(seen, [0xFF, 0xFF, 0x0F, 0xFF, 0xFF]);
    }

    #[test]
    fn flags_from_feedback() {
        let icons = flags_to_icons(&[0x00, 0x46, 0x08, 0x00, 0xFC]);
        assert_eq!(
            icons_that_are_on(&icons),
            ["II", "HDMI", "Pro Logic", "Standby LED", "SW", "SR", "SL", "FR", "C", "FL"]
        );
    }

    #[test]
    fn no_flags_no_icons() {
        assert!(icons_that_are_on(&flags_to_icons(&[0; FLAG_BYTES])).is_empty());
    }

    #[test]
    fn icon_list_round_trip() {
        let flags = icon_list_to_flags(&["A", "HDMI", "Standby LED", "Zone", "FL"]).unwrap();
        assert_eq!(flags, [0x01, 0x04, 0x08, 0x80, 0x80]);
        assert_eq!(
            icons_that_are_on(&flags_to_icons(&flags)),
            ["A", "HDMI", "Standby LED", "Zone", "FL"]
        );
    }

    #[test]
    fn unknown_icon_label() {
        assert_eq!(
            icon_list_to_flags(&["HDMI", "Atmos"]),
            Err(MessageError::UnknownIcon("Atmos".to_string()))
        );
    }

    #[test]
    fn lookup_by_label() {
        let icon = icon_by_label("SW").unwrap();
        assert_eq!(icon.friendly_name, "Subwoofer");
        assert_eq!(icon.category, IconCategory::Speaker);
        assert!(icon_by_label("sw").is_none());
    }
}
