//! Settings persistence
//!
//! The settings record is stored as a fixed 10 byte block prefixed with a
//! marker byte. Whatever medium holds it (EEPROM emulation, a flash sector)
//! is hidden behind [`StorageDriver`]. Only whole records are read and written.

use bytemuck::{Pod, Zeroable};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::color::{KelvinRange, MAX_BRIGHTNESS_PERCENT, legacy_brightness_to_percent};
use crate::schedule::{Schedule, TimeOfDay};
use crate::settings::Settings;

/// Marker byte identifying a valid settings record
pub const SETTINGS_MARKER: u8 = 0xA5;

/// Size of the encoded settings record
pub const SETTINGS_RECORD_SIZE: usize = core::mem::size_of::<PersistedSettings>();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// The underlying medium failed
    DriverError,
    /// The record does not start with [`SETTINGS_MARKER`] (first boot or erased)
    InvalidMagicHeader,
    /// The record is marked valid but holds out of range values
    InvalidData,
}

/// Byte level access to the medium holding the settings record
pub trait StorageDriver {
    /// Read `buffer.len()` bytes from the start of the record area
    fn read(&mut self, buffer: &mut [u8]) -> Result<(), StorageError>;

    /// Write and commit `buffer` to the start of the record area
    fn write(&mut self, buffer: &[u8]) -> Result<(), StorageError>;
}

/// On-medium layout of the settings record
#[derive(Debug, Clone, Copy, Zeroable, Pod)]
#[repr(C)]
pub(crate) struct PersistedSettings {
    marker: u8,
    brightness: u8,
    temperature: u16,
    power: u8,
    on_hour: u8,
    on_minute: u8,
    off_hour: u8,
    off_minute: u8,
    schedule_enabled: u8,
}

impl From<&Settings> for PersistedSettings {
    fn from(settings: &Settings) -> Self {
        Self {
            marker: SETTINGS_MARKER,
            brightness: settings.brightness,
            temperature: settings.temperature,
            power: u8::from(settings.power),
            on_hour: settings.schedule.on.hour(),
            on_minute: settings.schedule.on.minute(),
            off_hour: settings.schedule.off.hour(),
            off_minute: settings.schedule.off.minute(),
            schedule_enabled: u8::from(settings.schedule.enabled),
        }
    }
}

impl PersistedSettings {
    /// Validate the record and convert it to settings
    ///
    /// Brightness above 100 was written by firmware using the 0-255 scale
    /// and is migrated to percent.
    fn into_settings(self, temperature: KelvinRange) -> Result<Settings, StorageError> {
        if self.marker != SETTINGS_MARKER {
            return Err(StorageError::InvalidMagicHeader);
        }
        if !temperature.contains(self.temperature)
            || self.power > 1
            || self.schedule_enabled > 1
        {
            return Err(StorageError::InvalidData);
        }
        let on = TimeOfDay::new(self.on_hour, self.on_minute).ok_or(StorageError::InvalidData)?;
        let off =
            TimeOfDay::new(self.off_hour, self.off_minute).ok_or(StorageError::InvalidData)?;

        let brightness = if self.brightness > MAX_BRIGHTNESS_PERCENT {
            legacy_brightness_to_percent(self.brightness)
        } else {
            self.brightness
        };

        Ok(Settings {
            brightness,
            temperature: self.temperature,
            power: self.power != 0,
            schedule: Schedule {
                enabled: self.schedule_enabled != 0,
                on,
                off,
            },
        })
    }
}

/// Settings persistence on top of a storage driver
pub struct SettingsStore<D: StorageDriver> {
    driver: D,
}

impl<D: StorageDriver> SettingsStore<D> {
    pub const fn new(driver: D) -> Self {
        Self { driver }
    }

    /// Load the settings record
    ///
    /// Fails when the medium can not be read or holds no valid record.
    pub fn load(&mut self, temperature: KelvinRange) -> Result<Settings, StorageError> {
        let mut buffer = [0u8; SETTINGS_RECORD_SIZE];
        self.driver.read(&mut buffer)?;
        let settings = decode_settings(&buffer, temperature)?;

        #[cfg(feature = "esp32-log")]
        println!(
            "[STORAGE] Loaded: brightness={} temp={} power={}",
            settings.brightness, settings.temperature, settings.power
        );
        Ok(settings)
    }

    /// Write the whole settings record
    pub fn save(&mut self, settings: &Settings) -> Result<(), StorageError> {
        self.driver.write(&encode_settings(settings))
    }

    /// Get a reference to the storage driver
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// Get a mutable reference to the storage driver
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }
}

/// Encode settings into the on-medium byte layout
pub fn encode_settings(settings: &Settings) -> [u8; SETTINGS_RECORD_SIZE] {
    let record = PersistedSettings::from(settings);
    let mut out = [0u8; SETTINGS_RECORD_SIZE];
    out.copy_from_slice(bytemuck::bytes_of(&record));
    out
}

/// Decode and validate settings from the on-medium byte layout
pub fn decode_settings(
    bytes: &[u8; SETTINGS_RECORD_SIZE],
    temperature: KelvinRange,
) -> Result<Settings, StorageError> {
    let record: PersistedSettings = bytemuck::pod_read_unaligned(bytes);
    record.into_settings(temperature)
}
