//! Debounced push button
//!
//! The button is wired active-low (pull-up, pressed pulls to ground). A press
//! is reported once the low level has been stable for longer than the
//! debounce time.

use embassy_time::{Duration, Instant};

/// Debounce state of an active-low button
#[derive(Debug, Clone)]
pub struct ButtonDebouncer {
    debounce: Duration,
    /// Last accepted level (`true` = released)
    stable: bool,
    /// Level seen on the previous update
    last_reading: bool,
    /// Time the raw level last changed
    last_change: Instant,
}

impl ButtonDebouncer {
    /// Create a debouncer for a released button
    pub const fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            stable: true,
            last_reading: true,
            last_change: Instant::from_millis(0),
        }
    }

    /// Feed a raw pin reading (`true` = high)
    ///
    /// Returns `true` exactly once per debounced press.
    pub fn update(&mut self, level_high: bool, now: Instant) -> bool {
        if level_high != self.last_reading {
            self.last_change = now;
        }
        self.last_reading = level_high;

        let settled = now.saturating_duration_since(self.last_change) > self.debounce;
        if !settled || level_high == self.stable {
            return false;
        }

        self.stable = level_high;
        !self.stable
    }

    /// Check if the button is currently held down
    pub const fn is_pressed(&self) -> bool {
        !self.stable
    }
}
