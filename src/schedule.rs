//! Daily on/off schedule
//!
//! A schedule keeps the light on inside the local time window `[on, off)`.
//! Windows where `off` is earlier than `on` wrap around midnight.

use core::fmt::{self, Write as _};

use heapless::String;
use serde::{Serialize, Serializer};

/// Placeholder shown instead of the local time before it is known
pub const UNKNOWN_TIME: &str = "--:--";

/// Error returned when a `HH:MM` string can not be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeParseError;

/// Local time of day with minute precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeOfDay {
    pub(crate) hour: u8,
    pub(crate) minute: u8,
}

impl TimeOfDay {
    pub const MIDNIGHT: Self = Self { hour: 0, minute: 0 };

    /// Create a time of day, returns `None` for out of range values
    pub const fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self { hour, minute })
        } else {
            None
        }
    }

    /// Parse a `H:MM` or `HH:MM` string
    pub fn parse(value: &str) -> Result<Self, TimeParseError> {
        let (hour, minute) = value.trim().split_once(':').ok_or(TimeParseError)?;
        if hour.is_empty() || minute.is_empty() {
            return Err(TimeParseError);
        }
        let hour = hour.parse::<u8>().map_err(|_| TimeParseError)?;
        let minute = minute.parse::<u8>().map_err(|_| TimeParseError)?;
        Self::new(hour, minute).ok_or(TimeParseError)
    }

    pub const fn hour(self) -> u8 {
        self.hour
    }

    pub const fn minute(self) -> u8 {
        self.minute
    }

    /// Minutes since midnight
    #[allow(clippy::cast_lossless)]
    pub const fn minutes(self) -> u16 {
        self.hour as u16 * 60 + self.minute as u16
    }

    /// Format as zero padded `HH:MM`
    pub fn to_hhmm(self) -> String<5> {
        let mut out = String::new();
        // Five bytes always fit "HH:MM"
        let _ = write!(out, "{}", self);
        out
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Serialized as a zero padded `HH:MM` string
impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hhmm())
    }
}

/// Daily power schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub enabled: bool,
    pub on: TimeOfDay,
    pub off: TimeOfDay,
}

impl Schedule {
    /// Check if the light should be on at `now`
    ///
    /// An empty window (`on == off`) is never active.
    pub const fn is_active_at(&self, now: TimeOfDay) -> bool {
        let current = now.minutes();
        let on = self.on.minutes();
        let off = self.off.minutes();

        if on == off {
            return false;
        }
        if on < off {
            return current >= on && current < off;
        }
        current >= on || current < off
    }

    /// Power state the schedule demands at `now`
    ///
    /// Returns `None` when the schedule is disabled.
    pub const fn power_at(&self, now: TimeOfDay) -> Option<bool> {
        if !self.enabled {
            return None;
        }
        Some(self.is_active_at(now))
    }
}
