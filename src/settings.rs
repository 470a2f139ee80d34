//! Device settings record
//!
//! The settings record is the unit of persistence. It is only changed by the
//! control loop, and every value is clamped before it is stored.

use crate::color::{KelvinRange, MAX_BRIGHTNESS_PERCENT};
use crate::schedule::{Schedule, TimeOfDay};

/// User facing light settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Brightness in percent (0-100)
    pub brightness: u8,
    /// Color temperature in Kelvin
    pub temperature: u16,
    /// Whether the light is on
    pub power: bool,
    /// Daily on/off schedule
    pub schedule: Schedule,
}

impl Settings {
    /// Settings used on first boot or when the stored record is corrupt
    pub const DEFAULT: Self = Self {
        brightness: 70,
        temperature: 2000,
        power: true,
        schedule: Schedule {
            enabled: false,
            on: TimeOfDay { hour: 18, minute: 0 },
            off: TimeOfDay {
                hour: 23,
                minute: 30,
            },
        },
    };

    /// Return a copy with brightness and temperature clamped into bounds
    #[must_use]
    pub const fn clamped(mut self, temperature: KelvinRange) -> Self {
        if self.brightness > MAX_BRIGHTNESS_PERCENT {
            self.brightness = MAX_BRIGHTNESS_PERCENT;
        }
        self.temperature = temperature.clamp(self.temperature);
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Partial update of the settings record
///
/// Numeric values are kept wide so that out of range requests are clamped
/// instead of wrapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub brightness: Option<i32>,
    pub temperature: Option<i32>,
    pub power: Option<bool>,
    pub schedule_enabled: Option<bool>,
    pub on_time: Option<TimeOfDay>,
    pub off_time: Option<TimeOfDay>,
}

impl SettingsPatch {
    /// Create an empty patch (no changes)
    pub const fn new() -> Self {
        Self {
            brightness: None,
            temperature: None,
            power: None,
            schedule_enabled: None,
            on_time: None,
            off_time: None,
        }
    }

    #[must_use]
    pub const fn with_brightness(mut self, brightness: i32) -> Self {
        self.brightness = Some(brightness);
        self
    }

    #[must_use]
    pub const fn with_temperature(mut self, temperature: i32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    #[must_use]
    pub const fn with_power(mut self, on: bool) -> Self {
        self.power = Some(on);
        self
    }

    #[must_use]
    pub const fn with_schedule(mut self, enabled: bool) -> Self {
        self.schedule_enabled = Some(enabled);
        self
    }

    #[must_use]
    pub const fn with_on_time(mut self, time: TimeOfDay) -> Self {
        self.on_time = Some(time);
        self
    }

    #[must_use]
    pub const fn with_off_time(mut self, time: TimeOfDay) -> Self {
        self.off_time = Some(time);
        self
    }

    /// Check if the patch changes nothing
    pub const fn is_empty(&self) -> bool {
        self.brightness.is_none()
            && self.temperature.is_none()
            && self.power.is_none()
            && self.schedule_enabled.is_none()
            && self.on_time.is_none()
            && self.off_time.is_none()
    }

    /// Apply the patch to `settings`, clamping numeric values into bounds
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn apply(&self, settings: &mut Settings, temperature: KelvinRange) {
        if let Some(brightness) = self.brightness {
            settings.brightness = brightness.clamp(0, i32::from(MAX_BRIGHTNESS_PERCENT)) as u8;
        }
        if let Some(kelvin) = self.temperature {
            settings.temperature = temperature.clamp_i32(kelvin);
        }
        if let Some(power) = self.power {
            settings.power = power;
        }
        if let Some(enabled) = self.schedule_enabled {
            settings.schedule.enabled = enabled;
        }
        if let Some(on) = self.on_time {
            settings.schedule.on = on;
        }
        if let Some(off) = self.off_time {
            settings.schedule.off = off;
        }
    }
}
