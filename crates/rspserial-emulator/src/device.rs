//! Emulated device state and the display it produces.

use std::collections::HashMap;

use rspserial_message::{icon_list_to_flags, FeedbackMessage, ModelMeta};
use serde::Serialize;
use tracing::{error, info};

const OFF_LINE: &str = "\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0\0";
const OFF_ICONS: &[&str] = &["Standby LED"];

/// What the display shows for a source: the info line and lit icons.
struct SourceAttribs {
    info: &'static str,
    icons: &'static [&'static str],
}

const STEREO_ICONS: &[&str] = &["A", "Standby LED", "SW", "FR", "FL"];
const PRO_LOGIC_ICONS: &[&str] = &[
    "II", "HDMI", "Pro Logic", "Standby LED", "SW", "SR", "SL", "FR", "C", "FL",
];
const DOLBY_DIGITAL_ICONS: &[&str] = &[
    "HDMI", "Optical", "1", "Dolby Digital", "Standby LED", "SW", "SR", "SL", "FR", "C", "FL",
];
const FIVE_CHANNEL_ICONS: &[&str] = &["A", "Standby LED", "SW", "SR", "SL", "FR", "C", "FL"];
const BYPASS_ICONS: &[&str] = &["Standby LED", "CBL", "CBR", "SW", "SR", "SL", "FR", "C", "FL"];

/// Plausible display contents per standard source name.
fn source_attribs(source: &str) -> Option<SourceAttribs> {
    let (info, icons) = match source {
        " CD" | "TUNER" | "TAPE" => ("STEREO          44.1K", STEREO_ICONS),
        "VIDEO 1" => ("DOLBY PL\x19 C     48K  ", PRO_LOGIC_ICONS),
        "VIDEO 2" => ("DOLBY PL\x19 M     48K  ", PRO_LOGIC_ICONS),
        "VIDEO 3" | "VIDEO 6" => ("DOLBY DIGITAL   48K  ", DOLBY_DIGITAL_ICONS),
        "VIDEO 4" => ("5CH STEREO      48K  ", FIVE_CHANNEL_ICONS),
        "VIDEO 5" | "iPod/USB" => ("PCM 2CH         48K  ", STEREO_ICONS),
        "MULTI" => ("BYPASS          48K  ", BYPASS_ICONS),
        _ => return None,
    };
    Some(SourceAttribs { info, icons })
}

/// Externally visible device state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceState {
    pub is_on: bool,
    pub is_muted: bool,
    pub volume: u8,
    /// Standard name of the selected source.
    pub source: String,
    pub party_mode: bool,
}

/// Whether an operation changed the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Outcome {
    /// Nothing to report.
    Unchanged,
    /// Send a feedback message.
    Feedback,
    /// Wait for the boot delay, then [`Device::finish_power_on`].
    Booting,
}

pub struct Device {
    state: DeviceState,
    aliases: HashMap<String, String>,
    min_volume: u8,
    max_volume: u8,
    initial_volume: u8,
    mute_blink_count: u32,
}

impl Device {
    pub fn new(meta: &ModelMeta, aliases: HashMap<String, String>, is_on: bool) -> Self {
        Self {
            state: DeviceState {
                is_on,
                is_muted: false,
                volume: meta.initial_volume,
                source: meta.initial_source.clone(),
                party_mode: false,
            },
            aliases,
            min_volume: meta.min_volume,
            max_volume: meta.max_volume,
            initial_volume: meta.initial_volume,
            mute_blink_count: 0,
        }
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    /// The display alternates while the device is on and muted.
    pub fn is_blinking(&self) -> bool {
        self.state.is_on && self.state.is_muted
    }

    pub fn turn_on(&mut self) -> Outcome {
        if self.state.is_on {
            if self.state.is_muted {
                self.state.is_muted = false;
                return Outcome::Feedback;
            }
            return Outcome::Unchanged;
        }
        self.state.is_on = true;
        self.state.volume = self.initial_volume;
        info!("powering on");
        Outcome::Booting
    }

    /// Second half of power-on, after the boot delay.
    pub fn finish_power_on(&mut self) -> Outcome {
        self.state.is_muted = false;
        Outcome::Feedback
    }

    pub fn turn_off(&mut self) -> Outcome {
        if !self.state.is_on {
            return Outcome::Unchanged;
        }
        self.state.is_on = false;
        info!("powering off");
        Outcome::Feedback
    }

    pub fn toggle(&mut self) -> Outcome {
        if self.state.is_on {
            self.turn_off()
        } else {
            self.turn_on()
        }
    }

    /// Set the main volume. Out-of-range levels still unmute but are otherwise ignored.
    pub fn set_volume(&mut self, level: i32) -> Outcome {
        if !self.state.is_on {
            return Outcome::Unchanged;
        }
        self.state.is_muted = false;
        match u8::try_from(level) {
            Ok(level) if (self.min_volume..=self.max_volume).contains(&level) => {
                self.state.volume = level;
                Outcome::Feedback
            }
            _ => Outcome::Unchanged,
        }
    }

    pub fn volume_up(&mut self) -> Outcome {
        self.set_volume(i32::from(self.state.volume) + 1)
    }

    pub fn volume_down(&mut self) -> Outcome {
        self.set_volume(i32::from(self.state.volume) - 1)
    }

    pub fn mute_toggle(&mut self) -> Outcome {
        if !self.state.is_on {
            return Outcome::Unchanged;
        }
        self.state.is_muted = !self.state.is_muted;
        self.mute_blink_count = 0;
        Outcome::Feedback
    }

    pub fn party_mode_toggle(&mut self) -> Outcome {
        if !self.state.is_on {
            return Outcome::Unchanged;
        }
        self.state.party_mode = !self.state.party_mode;
        Outcome::Feedback
    }

    /// Select a source by standard name. Unknown sources are ignored.
    pub fn set_source(&mut self, source: &str) -> Outcome {
        if !self.state.is_on || source_attribs(source).is_none() {
            return Outcome::Unchanged;
        }
        self.state.source = source.to_string();
        Outcome::Feedback
    }

    pub fn display_refresh(&mut self) -> Outcome {
        if self.state.is_on {
            Outcome::Feedback
        } else {
            Outcome::Unchanged
        }
    }

    /// Advance the mute blink by one step.
    pub fn blink(&mut self) -> Outcome {
        self.mute_blink_count = self.mute_blink_count.wrapping_add(1);
        Outcome::Feedback
    }

    fn formatted_volume(&self) -> String {
        if self.state.is_muted {
            if self.mute_blink_count % 2 == 0 {
                "MUTE ON".to_string()
            } else {
                "       ".to_string()
            }
        } else {
            format!("VOL  {:02}", self.state.volume)
        }
    }

    fn display_line_1(&self) -> String {
        if !self.state.is_on {
            return OFF_LINE.to_string();
        }
        let name = self
            .aliases
            .get(&self.state.source)
            .unwrap_or(&self.state.source);
        let party = if self.state.party_mode { "pty" } else { "" };
        format!("{name:<8.8}  {party:<3.3} {:<7.7}", self.formatted_volume())
    }

    fn attribs(&self) -> (&'static str, &'static [&'static str]) {
        match source_attribs(&self.state.source) {
            Some(attribs) if self.state.is_on => (attribs.info, attribs.icons),
            _ => (OFF_LINE, OFF_ICONS),
        }
    }

    /// What the front panel shows right now.
    pub fn feedback(&self) -> FeedbackMessage {
        let (info, icons) = self.attribs();
        let flags = icon_list_to_flags(icons).unwrap_or_else(|err| {
            error!(%err, "source icon table is inconsistent");
            [0; 5]
        });
        FeedbackMessage::new(self.display_line_1(), info, flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(is_on: bool) -> Device {
        Device::new(&ModelMeta::rsp1570(), HashMap::new(), is_on)
    }

    #[test]
    fn every_source_has_valid_icons() {
        for meta in [ModelMeta::rsp1570(), ModelMeta::rsp1572()] {
            for source in &meta.sources {
                let attribs = source_attribs(&source.standard_name).unwrap();
                assert_eq!(attribs.info.len(), 21, "{}", source.standard_name);
                icon_list_to_flags(attribs.icons).unwrap();
            }
        }
    }

    #[test]
    fn initial_display() {
        let feedback = device(true).feedback();
        assert_eq!(feedback.lines[0], "VIDEO 1       VOL  50");
        assert_eq!(feedback.lines[1], "DOLBY PL\x19 C     48K  ");
        assert_eq!(feedback.flags, [0x00, 0x46, 0x08, 0x00, 0xFC]);
    }

    #[test]
    fn off_display() {
        let feedback = device(false).feedback();
        assert_eq!(feedback.lines[0], OFF_LINE);
        assert_eq!(feedback.lines[1], OFF_LINE);
        assert_eq!(feedback.icons_that_are_on(), ["Standby LED"]);
        assert_eq!(feedback.parse_display_lines().is_on, Some(false));
    }

    #[test]
    fn alias_and_party_mode() {
        let mut aliases = HashMap::new();
        aliases.insert(" CD".to_string(), "CD ALIAS LONGER".to_string());
        let mut device = Device::new(&ModelMeta::rsp1570(), aliases, true);
        assert_eq!(device.set_source(" CD"), Outcome::Feedback);
        assert_eq!(device.party_mode_toggle(), Outcome::Feedback);
        let feedback = device.feedback();
        assert_eq!(feedback.lines[0], "CD ALIAS  pty VOL  50");
        assert_eq!(feedback.lines[1], "STEREO          44.1K");
        assert_eq!(feedback.flags, [0x01, 0x00, 0x08, 0x00, 0xA4]);
    }

    #[test]
    fn commands_ignored_while_off() {
        let mut device = device(false);
        assert_eq!(device.volume_up(), Outcome::Unchanged);
        assert_eq!(device.mute_toggle(), Outcome::Unchanged);
        assert_eq!(device.set_source("TUNER"), Outcome::Unchanged);
        assert_eq!(device.display_refresh(), Outcome::Unchanged);
        assert_eq!(device.turn_off(), Outcome::Unchanged);
        assert_eq!(device.state().source, "VIDEO 1");
    }

    #[test]
    fn power_cycle_resets_volume_and_mute() {
        let mut device = device(true);
        assert_eq!(device.set_volume(20), Outcome::Feedback);
        assert_eq!(device.mute_toggle(), Outcome::Feedback);
        assert_eq!(device.toggle(), Outcome::Feedback);
        assert!(!device.is_blinking());
        assert_eq!(device.toggle(), Outcome::Booting);
        assert_eq!(device.state().volume, 50);
        assert_eq!(device.finish_power_on(), Outcome::Feedback);
        assert!(!device.state().is_muted);
    }

    #[test]
    fn power_on_when_on_only_unmutes() {
        let mut device = device(true);
        assert_eq!(device.turn_on(), Outcome::Unchanged);
        assert_eq!(device.mute_toggle(), Outcome::Feedback);
        assert_eq!(device.turn_on(), Outcome::Feedback);
        assert!(!device.state().is_muted);
    }

    #[test]
    fn mute_blinks() {
        let mut device = device(true);
        assert_eq!(device.mute_toggle(), Outcome::Feedback);
        assert!(device.is_blinking());
        assert_eq!(device.feedback().lines[0], "VIDEO 1       MUTE ON");
        assert_eq!(device.blink(), Outcome::Feedback);
        assert_eq!(device.feedback().lines[0], "VIDEO 1              ");
        assert_eq!(device.blink(), Outcome::Feedback);
        assert_eq!(device.feedback().lines[0], "VIDEO 1       MUTE ON");
    }

    #[test]
    fn volume_limits() {
        let mut device = device(true);
        assert_eq!(device.set_volume(96), Outcome::Feedback);
        assert_eq!(device.volume_up(), Outcome::Unchanged);
        assert_eq!(device.state().volume, 96);
        assert_eq!(device.set_volume(0), Outcome::Feedback);
        assert_eq!(device.volume_down(), Outcome::Unchanged);
        assert_eq!(device.state().volume, 0);
        assert_eq!(device.feedback().lines[0], "VIDEO 1       VOL  00");
    }

    #[test]
    fn volume_change_unmutes() {
        let mut device = device(true);
        assert_eq!(device.mute_toggle(), Outcome::Feedback);
        assert_eq!(device.volume_up(), Outcome::Feedback);
        assert!(!device.state().is_muted);
        assert_eq!(device.state().volume, 51);
    }
}
