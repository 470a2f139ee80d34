use embassy_time::Instant;

use crate::color::{BLACK, KelvinRange, Rgb, apply_brightness, kelvin_to_rgb, scale_rgb};
use crate::config::StripConfig;
use crate::current::CurrentBudget;
use crate::fade::{PowerFade, ZERO_SCALE, power_scale};
use crate::settings::Settings;

/// Strip renderer - turns settings into a uniform frame
///
/// Every render runs the fixed chain
/// kelvin -> brightness -> current limit -> power fade.
pub struct StripRenderer<const MAX_LEDS: usize> {
    // Configuration
    budget: CurrentBudget,
    temperature: KelvinRange,
    led_count: usize,

    // Internal state
    fade: PowerFade,
    applied_power: bool,
    last_color: Rgb,
    last_scale: u8,
    frame_buffer: [Rgb; MAX_LEDS],
}

impl<const MAX_LEDS: usize> StripRenderer<MAX_LEDS> {
    /// Create a new renderer in sync with the boot settings
    ///
    /// The fade rests at the scale of the boot power state, so there is no
    /// fade after a reboot.
    pub fn new(config: &StripConfig, settings: &Settings) -> Self {
        let led_count = usize::from(config.led_count).min(MAX_LEDS);
        // Budget only the pixels that are actually driven
        let budget = CurrentBudget {
            led_count: u16::try_from(led_count).unwrap_or(config.led_count),
            ..config.current_budget()
        };
        Self {
            budget,
            temperature: config.temperature,
            led_count,
            fade: PowerFade::for_power(settings.power, config.fade_duration),
            applied_power: settings.power,
            last_color: BLACK,
            last_scale: power_scale(settings.power),
            frame_buffer: [BLACK; MAX_LEDS],
        }
    }

    /// Render one frame
    ///
    /// Starts a power fade if the power state changed since the last render.
    /// Returns the pixels to push to the strip.
    pub fn render(&mut self, settings: &Settings, now: Instant) -> &[Rgb] {
        if settings.power != self.applied_power {
            self.applied_power = settings.power;
            self.fade.start(power_scale(settings.power), now);
        }

        let scale = self.fade.scale(now);
        let color = if scale == ZERO_SCALE {
            BLACK
        } else {
            self.compose(settings, scale)
        };

        self.last_scale = scale;
        self.last_color = color;

        let frame = &mut self.frame_buffer[..self.led_count];
        frame.fill(color);
        frame
    }

    /// Compute the color driven at the given fade scale
    fn compose(&self, settings: &Settings, scale: u8) -> Rgb {
        let temperature = self.temperature.clamp(settings.temperature);
        let color = kelvin_to_rgb(temperature);
        let color = apply_brightness(color, settings.brightness);
        let color = self.budget.limit(color);
        scale_rgb(color, scale)
    }

    /// Check if a power fade is in flight
    pub const fn is_fading(&self) -> bool {
        self.fade.is_active()
    }

    /// Color written by the last render
    pub const fn last_color(&self) -> Rgb {
        self.last_color
    }

    /// Fade scale used by the last render
    pub const fn last_scale(&self) -> u8 {
        self.last_scale
    }

    /// Number of pixels in a frame
    pub const fn led_count(&self) -> usize {
        self.led_count
    }

    /// Current budget applied to every frame
    pub const fn budget(&self) -> CurrentBudget {
        self.budget
    }
}
