mod kelvin;
mod utils;

pub use kelvin::{KelvinRange, kelvin_to_rgb};
use smart_leds::RGB8;
pub use utils::{
    MAX_BRIGHTNESS_PERCENT, apply_brightness, legacy_brightness_to_percent, scale_rgb,
};

pub type Rgb = RGB8;

/// Black color, emitted while the strip is powered off
pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
