//! Strip current budget
//!
//! Estimates the theoretical draw of a uniform color across the strip and
//! dims all channels together when it exceeds the power supply budget.

use crate::color::{Rgb, scale_rgb};

/// Draw of one fully lit color channel of a WS2812 pixel
pub const DEFAULT_MA_PER_CHANNEL: u32 = 20;

/// Estimate strip current in milliamps for a uniform color
///
/// Each channel draws `ma_per_channel` at value 255 and scales linearly below
/// that. The result is rounded up.
#[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
pub const fn estimate_current_ma(color: Rgb, led_count: u16, ma_per_channel: u32) -> u32 {
    let channel_sum = color.r as u64 + color.g as u64 + color.b as u64;
    let numerator = led_count as u64 * channel_sum * ma_per_channel as u64;
    let estimate = numerator.div_ceil(255);
    if estimate > u32::MAX as u64 {
        u32::MAX
    } else {
        estimate as u32
    }
}

/// Current limiter for a strip of a known length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentBudget {
    /// Number of LEDs driven with the same color
    pub led_count: u16,
    /// Maximum allowed draw of the whole strip
    pub max_current_ma: u32,
    /// Draw of a single channel at full scale
    pub ma_per_channel: u32,
}

impl CurrentBudget {
    pub const fn new(led_count: u16, max_current_ma: u32) -> Self {
        Self {
            led_count,
            max_current_ma,
            ma_per_channel: DEFAULT_MA_PER_CHANNEL,
        }
    }

    /// Estimated draw of the strip showing `color`
    pub const fn estimate(&self, color: Rgb) -> u32 {
        estimate_current_ma(color, self.led_count, self.ma_per_channel)
    }

    /// Check if the color can be shown without exceeding the budget
    pub const fn fits(&self, color: Rgb) -> bool {
        self.estimate(color) <= self.max_current_ma
    }

    /// Dim `color` uniformly until the strip draw fits the budget
    ///
    /// Colors already within budget are returned unchanged. All channels are
    /// multiplied by the same factor so the hue is kept.
    #[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
    pub fn limit(&self, color: Rgb) -> Rgb {
        let estimated = self.estimate(color);
        if estimated == 0 || estimated <= self.max_current_ma {
            return color;
        }

        let scale = (self.max_current_ma as u64 * 255 / estimated as u64).min(255) as u8;
        scale_rgb(color, scale)
    }
}

/// Limit `color` to `max_current_ma` for a strip of `led_count` pixels
pub fn limit_current(color: Rgb, led_count: u16, max_current_ma: u32) -> Rgb {
    CurrentBudget::new(led_count, max_current_ma).limit(color)
}
