//! RSP-1570 command codes as `(name, message type, key)`.
//!
//! Volume-direct commands are generated from the model volume bounds and are not listed here.

pub(crate) const RSP1570_COMMANDS: &[(&str, u8, u8)] = &[
    ("POWER_TOGGLE", 0x10, 0x0A),
    ("POWER_OFF", 0x10, 0x4A),
    ("POWER_ON", 0x10, 0x4B),
    ("VOLUME_UP", 0x10, 0x0B),
    ("VOLUME_DOWN", 0x10, 0x0C),
    ("MUTE_TOGGLE", 0x10, 0x1E),
    ("POWER_OFF_ALL_ZONES", 0x10, 0x71),
    ("SOURCE_CD", 0x10, 0x02),
    ("SOURCE_TUNER", 0x10, 0x03),
    ("SOURCE_TAPE", 0x10, 0x04),
    ("SOURCE_VIDEO_1", 0x10, 0x05),
    ("SOURCE_VIDEO_2", 0x10, 0x06),
    ("SOURCE_VIDEO_3", 0x10, 0x07),
    ("SOURCE_VIDEO_4", 0x10, 0x08),
    ("SOURCE_VIDEO_5", 0x10, 0x09),
    ("SOURCE_MULTI_INPUT", 0x10, 0x15),
    ("STEREO___BYPASS_TOGGLE", 0x10, 0x11),
    ("DOLBY_3_STEREO", 0x10, 0x12),
    ("DOLBY_PLIIX_MODE_TOGGLE", 0x10, 0x13),
    ("DOLBY_PLIIX_MODE_MUSIC_CINEMA_TOGGLE", 0x10, 0xA2),
    ("DSP_MODE_TOGGLE", 0x10, 0x14),
    ("DOLBY_3_STEREO___PLIIX_TOGGLE", 0x10, 0x53),
    ("DTS_NEO_6_MUSIC_CINEMA_TOGGLE", 0x10, 0x54),
    ("DSP_1", 0x10, 0x57),
    ("DSP_2", 0x10, 0x58),
    ("DSP_3", 0x10, 0x59),
    ("DSP_4", 0x10, 0x5A),
    ("5_CHANNEL_STEREO", 0x10, 0x5B),
    ("7_CHANNEL_STEREO", 0x10, 0x5C),
    ("DOLBY_PLIIX_CINEMA", 0x10, 0x5D),
    ("DOLBY_PLIIX_MUSIC", 0x10, 0x5E),
    ("DOLBY_PLIIX_GAME", 0x10, 0x74),
    ("DOLBY_PRO_LOGIC", 0x10, 0x5F),
    ("DOLBY_PLIIZ", 0x10, 0x92),
    ("DTS_NEO_6_MUSIC", 0x10, 0x60),
    ("DTS_NEO_6_CINEMA", 0x10, 0x61),
    ("PLII_PANORAMA_TOGGLE", 0x10, 0x62),
    ("PLII_DIMENSION_UP", 0x10, 0x63),
    ("PLII_DIMENSION_DOWN", 0x10, 0x64),
    ("PLII_CENTER_WIDTH_UP", 0x10, 0x65),
    ("PLII_CENTER_WIDTH_DOWN", 0x10, 0x66),
    ("DOLBY_DIGITAL_EX_TOGGLE", 0x10, 0x68),
    ("NEXT_SURROUND_MODE", 0x10, 0x22),
    ("OSD_MENU", 0x10, 0x18),
    ("ENTER", 0x10, 0x19),
    ("EXIT", 0x10, 0x90),
    ("CURSOR_RIGHT_KEY_PRESSED", 0x10, 0x1A),
    ("CURSOR_LEFT_KEY_PRESSED", 0x10, 0x1B),
    ("CURSOR_UP_KEY_PRESSED", 0x10, 0x1C),
    ("CURSOR_DOWN_KEY_PRESSED", 0x10, 0x1D),
    ("NUMBER_KEY_1", 0x10, 0x2A),
    ("NUMBER_KEY_2", 0x10, 0x2B),
    ("NUMBER_KEY_3", 0x10, 0x2C),
    ("NUMBER_KEY_4", 0x10, 0x2D),
    ("NUMBER_KEY_5", 0x10, 0x2E),
    ("NUMBER_KEY_6", 0x10, 0x2F),
    ("NUMBER_KEY_7", 0x10, 0x30),
    ("NUMBER_KEY_8", 0x10, 0x31),
    ("NUMBER_KEY_9", 0x10, 0x32),
    ("NUMBER_KEY_0", 0x10, 0x33),
    ("PLAY", 0x10, 0x85),
    ("PAUSE", 0x10, 0x86),
    ("STOP_KEY_PRESSED", 0x10, 0x87),
    ("TRACK_FORWARD_KEY_PRESSED", 0x10, 0x88),
    ("TRACK_BACK_KEY_PRESSED", 0x10, 0x89),
    ("SCAN_FORWARD_KEY_PRESSED", 0x10, 0x8A),
    ("SCAN_BACK_KEY_PRESSED", 0x10, 0x8B),
    ("SHUFFLE", 0x10, 0x8F),
    ("REPEAT", 0x10, 0x8C),
    ("RECORD_FUNCTION_SELECT", 0x10, 0x17),
    ("DYNAMIC_RANGE", 0x10, 0x16),
    ("TONE_CONTROL_SELECT", 0x10, 0x67),
    ("TREBLE_UP", 0x10, 0x0D),
    ("TREBLE_DOWN", 0x10, 0x0E),
    ("BASS_UP", 0x10, 0x0F),
    ("BASS_DOWN", 0x10, 0x10),
    ("DIGITAL_INPUT_SELECT", 0x10, 0x1F),
    ("ZONE_2___MAIN", 0x10, 0x23),
    ("TEMPORARY_CENTER_TRIM", 0x10, 0x4C),
    ("TEMPORARY_SUBWOOFER_TRIM", 0x10, 0x4D),
    ("TEMPORARY_SURROUND_TRIM", 0x10, 0x4E),
    ("CINEMA_EQ_TOGGLE", 0x10, 0x4F),
    ("FRONT_DISPLAY_ON_OFF", 0x10, 0x52),
    ("DISPLAY_REFRESH", 0x10, 0xFF),
    ("PARTY_MODE_TOGGLE", 0x10, 0x6E),
    ("OUTPUT_RESOLUTION", 0x10, 0x75),
    ("HDMI_AMP_MODE", 0x10, 0x78),
    ("HDMI_TV_MODE", 0x10, 0x79),
    ("DISPLAY", 0x10, 0x91),
    ("SPEAKER_LEVEL_SETTING_TOGGLE", 0x10, 0xA1),
    ("FORCE_FACTORY_DEFAULT", 0x10, 0x93),
    ("MAIN_ZONE_POWER_TOGGLE", 0x14, 0x0A),
    ("MAIN_ZONE_POWER_OFF", 0x14, 0x4A),
    ("MAIN_ZONE_POWER_ON", 0x14, 0x4B),
    ("MAIN_ZONE_VOLUME_UP", 0x14, 0x00),
    ("MAIN_ZONE_VOLUME_DOWN", 0x14, 0x01),
    ("MAIN_ZONE_MUTE_TOGGLE", 0x14, 0x1E),
    ("MAIN_ZONE_MUTE_ON", 0x14, 0x6C),
    ("MAIN_ZONE_MUTE_OFF", 0x14, 0x6D),
    ("MAIN_ZONE_POWER_OFF_ALL_ZONES", 0x14, 0x71),
    ("MAIN_ZONE_SOURCE_CD", 0x14, 0x02),
    ("MAIN_ZONE_SOURCE_TUNER", 0x14, 0x03),
    ("MAIN_ZONE_SOURCE_TAPE", 0x14, 0x04),
    ("MAIN_ZONE_SOURCE_VIDEO_1", 0x14, 0x05),
    ("MAIN_ZONE_SOURCE_VIDEO_2", 0x14, 0x06),
    ("MAIN_ZONE_SOURCE_VIDEO_3", 0x14, 0x07),
    ("MAIN_ZONE_SOURCE_VIDEO_4", 0x14, 0x08),
    ("MAIN_ZONE_SOURCE_VIDEO_5", 0x14, 0x09),
    ("MAIN_ZONE_SOURCE_MULTI_INPUT", 0x14, 0x15),
    ("RECORD_SOURCE_CD", 0x15, 0x02),
    ("RECORD_SOURCE_TUNER", 0x15, 0x03),
    ("RECORD_SOURCE_TAPE", 0x15, 0x04),
    ("RECORD_SOURCE_VIDEO_1", 0x15, 0x05),
    ("RECORD_SOURCE_VIDEO_2", 0x15, 0x06),
    ("RECORD_SOURCE_VIDEO_3", 0x15, 0x07),
    ("RECORD_SOURCE_VIDEO_4", 0x15, 0x08),
    ("RECORD_SOURCE_VIDEO_5", 0x15, 0x09),
    ("RECORD_FOLLOW_MAIN_ZONE_SOURCE", 0x15, 0x6B),
    ("ZONE_2_POWER_TOGGLE", 0x16, 0x0A),
    ("ZONE_2_POWER_OFF", 0x16, 0x4A),
    ("ZONE_2_POWER_ON", 0x16, 0x4B),
    ("ZONE_2_VOLUME_UP", 0x16, 0x00),
    ("ZONE_2_VOLUME_DOWN", 0x16, 0x01),
    ("ZONE_2_MUTE_TOGGLE", 0x16, 0x1E),
    ("ZONE_2_MUTE_ON", 0x16, 0x6C),
    ("ZONE_2_MUTE_OFF", 0x16, 0x6D),
    ("ZONE_2_POWER_OFF_ALL_ZONES", 0x16, 0x71),
    ("ZONE_2_SOURCE_CD", 0x16, 0x02),
    ("ZONE_2_SOURCE_TUNER", 0x16, 0x03),
    ("ZONE_2_SOURCE_TAPE", 0x16, 0x04),
    ("ZONE_2_SOURCE_VIDEO_1", 0x16, 0x05),
    ("ZONE_2_SOURCE_VIDEO_2", 0x16, 0x06),
    ("ZONE_2_SOURCE_VIDEO_3", 0x16, 0x07),
    ("ZONE_2_SOURCE_VIDEO_4", 0x16, 0x08),
    ("ZONE_2_SOURCE_VIDEO_5", 0x16, 0x09),
    ("ZONE_2_FOLLOW_MAIN_ZONE_SOURCE", 0x16, 0x6B),
    ("ZONE_2_PARTY_MODE_TOGGLE", 0x16, 0x6E),
    ("ZONE_3_POWER_TOGGLE", 0x17, 0x0A),
    ("ZONE_3_POWER_OFF", 0x17, 0x4A),
    ("ZONE_3_POWER_ON", 0x17, 0x4B),
    ("ZONE_3_VOLUME_UP", 0x17, 0x00),
    ("ZONE_3_VOLUME_DOWN", 0x17, 0x01),
    ("ZONE_3_MUTE_TOGGLE", 0x17, 0x1E),
    ("ZONE_3_MUTE_ON", 0x17, 0x6C),
    ("ZONE_3_MUTE_OFF", 0x17, 0x6D),
    ("ZONE_3_POWER_OFF_ALL_ZONES", 0x17, 0x71),
    ("ZONE_3_SOURCE_CD", 0x17, 0x02),
    ("ZONE_3_SOURCE_TUNER", 0x17, 0x03),
    ("ZONE_3_SOURCE_TAPE", 0x17, 0x04),
    ("ZONE_3_SOURCE_VIDEO_1", 0x17, 0x05),
    ("ZONE_3_SOURCE_VIDEO_2", 0x17, 0x06),
    ("ZONE_3_SOURCE_VIDEO_3", 0x17, 0x07),
    ("ZONE_3_SOURCE_VIDEO_4", 0x17, 0x08),
    ("ZONE_3_SOURCE_VIDEO_5", 0x17, 0x09),
    ("ZONE_3_FOLLOW_MAIN_ZONE_SOURCE", 0x17, 0x6B),
    ("ZONE_3_PARTY_MODE_TOGGLE", 0x17, 0x6E),
    ("ZONE_4_POWER_TOGGLE", 0x18, 0x0A),
    ("ZONE_4_POWER_OFF", 0x18, 0x4A),
    ("ZONE_4_POWER_ON", 0x18, 0x4B),
    ("ZONE_4_VOLUME_UP", 0x18, 0x00),
    ("ZONE_4_VOLUME_DOWN", 0x18, 0x01),
    ("ZONE_4_MUTE_TOGGLE", 0x18, 0x1E),
    ("ZONE_4_MUTE_ON", 0x18, 0x6C),
    ("ZONE_4_MUTE_OFF", 0x18, 0x6D),
    ("ZONE_4_POWER_OFF_ALL_ZONES", 0x18, 0x71),
    ("ZONE_4_SOURCE_CD", 0x18, 0x02),
    ("ZONE_4_SOURCE_TUNER", 0x18, 0x03),
    ("ZONE_4_SOURCE_TAPE", 0x18, 0x04),
    ("ZONE_4_SOURCE_VIDEO_1", 0x18, 0x05),
    ("ZONE_4_SOURCE_VIDEO_2", 0x18, 0x06),
    ("ZONE_4_SOURCE_VIDEO_3", 0x18, 0x07),
    ("ZONE_4_SOURCE_VIDEO_4", 0x18, 0x08),
    ("ZONE_4_SOURCE_VIDEO_5", 0x18, 0x09),
    ("ZONE_4_FOLLOW_MAIN_ZONE_SOURCE", 0x18, 0x6B),
    ("ZONE_4_PARTY_MODE_TOGGLE", 0x18, 0x6E),
    ("MAIN_ZONE_12V_TRIGGER_1_TOGGLE", 0x40, 0x00),
    ("MAIN_ZONE_12V_TRIGGER_2_TOGGLE", 0x40, 0x01),
    ("MAIN_ZONE_12V_TRIGGER_3_TOGGLE", 0x40, 0x02),
    ("MAIN_ZONE_12V_TRIGGER_4_TOGGLE", 0x40, 0x03),
    ("MAIN_ZONE_12V_TRIGGER_5_TOGGLE", 0x40, 0x04),
    ("MAIN_ZONE_12V_TRIGGER_6_TOGGLE", 0x40, 0x05),
    ("ZONE_2_12V_TRIGGER_1_TOGGLE", 0x40, 0x06),
    ("ZONE_2_12V_TRIGGER_2_TOGGLE", 0x40, 0x07),
    ("ZONE_2_12V_TRIGGER_3_TOGGLE", 0x40, 0x08),
    ("ZONE_2_12V_TRIGGER_4_TOGGLE", 0x40, 0x09),
    ("ZONE_2_12V_TRIGGER_5_TOGGLE", 0x40, 0x0A),
    ("ZONE_2_12V_TRIGGER_6_TOGGLE", 0x40, 0x0B),
    ("ZONE_3_12V_TRIGGER_1_TOGGLE", 0x40, 0x0C),
    ("ZONE_3_12V_TRIGGER_2_TOGGLE", 0x40, 0x0D),
    ("ZONE_3_12V_TRIGGER_3_TOGGLE", 0x40, 0x0E),
    ("ZONE_3_12V_TRIGGER_4_TOGGLE", 0x40, 0x0F),
    ("ZONE_3_12V_TRIGGER_5_TOGGLE", 0x40, 0x10),
    ("ZONE_3_12V_TRIGGER_6_TOGGLE", 0x40, 0x11),
    ("ZONE_4_12V_TRIGGER_1_TOGGLE", 0x40, 0x12),
    ("ZONE_4_12V_TRIGGER_2_TOGGLE", 0x40, 0x13),
    ("ZONE_4_12V_TRIGGER_3_TOGGLE", 0x40, 0x14),
    ("ZONE_4_12V_TRIGGER_4_TOGGLE", 0x40, 0x15),
    ("ZONE_4_12V_TRIGGER_5_TOGGLE", 0x40, 0x16),
    ("ZONE_4_12V_TRIGGER_6_TOGGLE", 0x40, 0x17),
];
