//! Power fade
//!
//! Smooth crossfade of the global intensity when the light is switched on or
//! off. A new switch while a fade is running restarts from the value that is
//! currently emitted, so the output never jumps.

use embassy_time::{Duration, Instant};

use crate::math8::lerp8;

/// Global intensity of a powered on strip
pub const FULL_SCALE: u8 = 255;

/// Global intensity of a powered off strip
pub const ZERO_SCALE: u8 = 0;

/// Linear 0-255 intensity transition
#[derive(Debug, Clone)]
pub struct PowerFade {
    /// Scale at the moment the fade was started
    start: u8,
    /// Scale the fade is heading to
    target: u8,
    /// Time at which the fade started
    started_at: Instant,
    /// Total fade duration
    duration: Duration,
    /// Whether a fade is in flight
    active: bool,
}

impl PowerFade {
    /// Create a fade resting at `scale`
    pub const fn steady(scale: u8, duration: Duration) -> Self {
        Self {
            start: scale,
            target: scale,
            started_at: Instant::from_millis(0),
            duration,
            active: false,
        }
    }

    /// Create a fade resting at the scale matching a power state
    pub const fn for_power(power: bool, duration: Duration) -> Self {
        Self::steady(power_scale(power), duration)
    }

    /// Start a fade towards `target`
    ///
    /// The start value is whatever is emitted at `now`, which may be in the
    /// middle of a previous fade.
    pub fn start(&mut self, target: u8, now: Instant) {
        let current = self.scale(now);
        self.start = current;
        self.target = target;
        self.started_at = now;
        self.active = current != target;
    }

    /// Scale emitted at `now`
    ///
    /// Finishes the fade once its duration has elapsed.
    pub fn scale(&mut self, now: Instant) -> u8 {
        if !self.active {
            return self.target;
        }

        let elapsed = now.saturating_duration_since(self.started_at);
        if elapsed >= self.duration {
            self.active = false;
            self.start = self.target;
            return self.target;
        }

        lerp8(self.start, self.target, elapsed, self.duration)
    }

    /// Check if a fade is in flight
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Scale the current fade ends at
    pub const fn target(&self) -> u8 {
        self.target
    }

    /// Duration of a full fade
    pub const fn duration(&self) -> Duration {
        self.duration
    }
}

/// Scale a strip should rest at for the power state
pub const fn power_scale(power: bool) -> u8 {
    if power { FULL_SCALE } else { ZERO_SCALE }
}
