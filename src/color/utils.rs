use crate::{
    color::Rgb,
    math8::{percent8, scale255},
};

/// Maximum brightness on the canonical percent scale
pub const MAX_BRIGHTNESS_PERCENT: u8 = 100;

/// Scale a color by a brightness percentage (0-100)
///
/// Each channel is scaled as `channel * percent / 100` with truncation,
/// so 100% is the identity and 0% is black.
#[inline]
pub fn apply_brightness(color: Rgb, percent: u8) -> Rgb {
    let percent = percent.min(MAX_BRIGHTNESS_PERCENT);
    Rgb {
        r: percent8(color.r, percent),
        g: percent8(color.g, percent),
        b: percent8(color.b, percent),
    }
}

/// Scale all channels of a color by the same factor (0-255 = 0.0-1.0)
#[inline]
pub fn scale_rgb(color: Rgb, scale: u8) -> Rgb {
    Rgb {
        r: scale255(color.r, scale),
        g: scale255(color.g, scale),
        b: scale255(color.b, scale),
    }
}

/// Convert a brightness from the legacy 0-255 scale to percent, rounding to nearest
#[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
pub const fn legacy_brightness_to_percent(raw: u8) -> u8 {
    ((raw as u16 * 100 + 127) / 255) as u8
}
