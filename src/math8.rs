use embassy_time::Duration;

/// Scale an 8-bit value by a factor (0-255 = 0.0-1.0)
///
/// Exact `value * scale / 255` with truncation, so 255 is the identity.
#[inline]
#[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
pub const fn scale255(value: u8, scale: u8) -> u8 {
    ((value as u16 * scale as u16) / 255) as u8
}

/// Scale an 8-bit value by a percentage (0-100)
#[inline]
#[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
pub const fn percent8(value: u8, percent: u8) -> u8 {
    ((value as u16 * percent as u16) / 100) as u8
}

/// Clamp a signed value into the `u8` range
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub const fn clamp_u8(value: i32) -> u8 {
    if value < 0 {
        0
    } else if value > 255 {
        255
    } else {
        value as u8
    }
}

/// Linearly interpolate between two 8-bit values by elapsed time
///
/// Returns `from + (to - from) * elapsed / duration` with truncation toward
/// zero. Saturates at `to` once `elapsed >= duration`.
#[inline]
#[allow(
    clippy::cast_lossless,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap
)]
pub const fn lerp8(from: u8, to: u8, elapsed: Duration, duration: Duration) -> u8 {
    let duration_ms = duration.as_millis();
    let elapsed_ms = elapsed.as_millis();
    if duration_ms == 0 || elapsed_ms >= duration_ms {
        return to;
    }

    let delta = to as i64 - from as i64;
    let value = from as i64 + (delta * elapsed_ms as i64) / duration_ms as i64;
    clamp_u8(value as i32)
}
