mod rsp1570;
mod rsp1572;

pub(crate) use rsp1570::RSP1570_COMMANDS;
pub(crate) use rsp1572::RSP1572_COMMANDS;

use crate::msgtype::VOLUME_DIRECT_TYPES;

/// Every volume-direct command between `min` and `max` for all four zones.
///
/// Names follow the device manual: `VOLUME_MIN`, `VOLUME_1` .. `VOLUME_<max-1>`,
/// `VOLUME_MAX`, with a `ZONE_n_` prefix outside the main zone.
pub(crate) fn volume_direct_commands(min: u8, max: u8) -> Vec<(String, u8, u8)> {
    let per_zone = usize::from(max).saturating_sub(usize::from(min)) + 1;
    let mut out = Vec::with_capacity(VOLUME_DIRECT_TYPES.len() * per_zone);
    for (zone, &message_type) in (1u8..).zip(VOLUME_DIRECT_TYPES.iter()) {
        let prefix = match zone {
            1 => String::new(),
            n => format!("ZONE_{n}_"),
        };
        for volume in min..=max {
            let suffix = if volume == min {
                "MIN".to_string()
            } else if volume == max {
                "MAX".to_string()
            } else {
                volume.to_string()
            };
            out.push((format!("{prefix}VOLUME_{suffix}"), message_type, volume));
        }
    }
    out
}
