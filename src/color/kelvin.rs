use super::Rgb;

/// Lowest temperature covered by the Planckian locus fit
pub const FIT_MIN_KELVIN: u16 = 1000;
/// Highest temperature covered by the Planckian locus fit
pub const FIT_MAX_KELVIN: u16 = 40000;

/// Inclusive color temperature range accepted by a deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KelvinRange {
    pub min: u16,
    pub max: u16,
}

impl KelvinRange {
    /// Create a new range. Bounds are swapped if given in reverse order.
    pub const fn new(min: u16, max: u16) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Clamp a requested temperature into the range
    pub const fn clamp(self, kelvin: u16) -> u16 {
        if kelvin < self.min {
            self.min
        } else if kelvin > self.max {
            self.max
        } else {
            kelvin
        }
    }

    /// Clamp a signed, possibly out-of-type request into the range
    #[allow(
        clippy::cast_lossless,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub const fn clamp_i32(self, kelvin: i32) -> u16 {
        if kelvin < self.min as i32 {
            self.min
        } else if kelvin > self.max as i32 {
            self.max
        } else {
            kelvin as u16
        }
    }

    /// Check if the temperature is within the range
    pub const fn contains(self, kelvin: u16) -> bool {
        kelvin >= self.min && kelvin <= self.max
    }
}

#[inline]
/// Convert a Kelvin temperature to an RGB color
///
/// Tanner Helland's fit of the Planckian locus. The constants are empirical
/// and must stay bit-for-bit identical across firmware variants.
/// Supports temperatures between 1000K and 40000K, anything outside is clamped.
#[allow(
    clippy::cast_lossless,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::excessive_precision
)]
pub fn kelvin_to_rgb(kelvin: u16) -> Rgb {
    let kelvin = kelvin.clamp(FIT_MIN_KELVIN, FIT_MAX_KELVIN);
    let temp = kelvin as f32 / 100.0;

    let red = if temp <= 66.0 {
        255.0
    } else {
        329.698_727_446 * libm::powf(temp - 60.0, -0.133_204_759_2)
    };

    let green = if temp <= 66.0 {
        99.470_802_586_1 * libm::logf(temp) - 161.119_568_166_1
    } else {
        288.122_169_528_3 * libm::powf(temp - 60.0, -0.075_514_849_2)
    };

    let blue = if temp >= 66.0 {
        255.0
    } else if temp <= 19.0 {
        0.0
    } else {
        138.517_731_223_1 * libm::logf(temp - 10.0) - 305.044_792_730_7
    };

    Rgb {
        r: red.clamp(0.0, 255.0) as u8,
        g: green.clamp(0.0, 255.0) as u8,
        b: blue.clamp(0.0, 255.0) as u8,
    }
}
