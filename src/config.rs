//! Strip configuration
//!
//! All tunable constants of the firmware live here so that variants only
//! differ by the `StripConfig` they are built with.

use embassy_time::Duration;

use crate::color::KelvinRange;
use crate::current::{CurrentBudget, DEFAULT_MA_PER_CHANNEL};

/// Number of LEDs on the reference strip
pub const DEFAULT_LED_COUNT: u16 = 63;

/// Power supply budget of the reference strip
pub const DEFAULT_MAX_CURRENT_MA: u32 = 1800;

/// Color temperature range of the reference strip
pub const DEFAULT_TEMPERATURE_RANGE: KelvinRange = KelvinRange::new(1000, 4000);

/// Duration of a power on/off fade
pub const DEFAULT_FADE_DURATION: Duration = Duration::from_millis(1000);

/// Minimum interval between two fade animation frames (~60 FPS)
pub const DEFAULT_FADE_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Interval between two schedule evaluations
pub const DEFAULT_SCHEDULE_CHECK_INTERVAL: Duration = Duration::from_millis(2000);

/// Quiet period after the last change before settings are written
pub const DEFAULT_SAVE_DELAY: Duration = Duration::from_millis(1200);

/// Time a button reading must be stable before it is accepted
pub const DEFAULT_BUTTON_DEBOUNCE: Duration = Duration::from_millis(60);

/// Configuration of the strip and its control loop
#[derive(Debug, Clone, Copy)]
pub struct StripConfig {
    /// Number of LEDs driven
    pub led_count: u16,
    /// Maximum draw of the whole strip
    pub max_current_ma: u32,
    /// Draw of a single channel at full scale
    pub ma_per_channel: u32,
    /// Accepted color temperatures
    pub temperature: KelvinRange,
    pub fade_duration: Duration,
    pub fade_frame_interval: Duration,
    pub schedule_check_interval: Duration,
    pub save_delay: Duration,
    pub button_debounce: Duration,
}

impl StripConfig {
    pub const DEFAULT: Self = Self {
        led_count: DEFAULT_LED_COUNT,
        max_current_ma: DEFAULT_MAX_CURRENT_MA,
        ma_per_channel: DEFAULT_MA_PER_CHANNEL,
        temperature: DEFAULT_TEMPERATURE_RANGE,
        fade_duration: DEFAULT_FADE_DURATION,
        fade_frame_interval: DEFAULT_FADE_FRAME_INTERVAL,
        schedule_check_interval: DEFAULT_SCHEDULE_CHECK_INTERVAL,
        save_delay: DEFAULT_SAVE_DELAY,
        button_debounce: DEFAULT_BUTTON_DEBOUNCE,
    };

    /// Set the number of LEDs
    #[must_use]
    pub const fn with_led_count(mut self, led_count: u16) -> Self {
        self.led_count = led_count;
        self
    }

    /// Set the strip current budget
    #[must_use]
    pub const fn with_max_current_ma(mut self, max_current_ma: u32) -> Self {
        self.max_current_ma = max_current_ma;
        self
    }

    /// Set the accepted color temperature range
    #[must_use]
    pub const fn with_temperature_range(mut self, range: KelvinRange) -> Self {
        self.temperature = range;
        self
    }

    /// Set the power fade duration
    #[must_use]
    pub const fn with_fade_duration(mut self, duration: Duration) -> Self {
        self.fade_duration = duration;
        self
    }

    /// Current budget for this strip
    pub const fn current_budget(&self) -> CurrentBudget {
        CurrentBudget {
            led_count: self.led_count,
            max_current_ma: self.max_current_ma,
            ma_per_channel: self.ma_per_channel,
        }
    }
}

impl Default for StripConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
