#![no_std]

pub mod api;
pub mod button;
pub mod color;
pub mod config;
pub mod controller;
pub mod current;
pub mod fade;
pub mod intent;
pub mod math8;
pub mod renderer;
pub mod schedule;
pub mod settings;
pub mod storage;
pub mod tasks;

pub use api::{HttpApi, HttpMethod, RequestContext, Response, Route, StateResponse};
pub use config::StripConfig;
pub use controller::Controller;
pub use current::CurrentBudget;
pub use fade::PowerFade;
pub use intent::{DeviceIntent, IntentInbox, IntentMailbox, IntentPoster};
pub use renderer::StripRenderer;
pub use schedule::{Schedule, TimeOfDay};
pub use settings::{Settings, SettingsPatch};
pub use storage::{SettingsStore, StorageDriver, StorageError};
pub use tasks::{LoopTask, RateLimit, TaskTable};

pub use color::{KelvinRange, Rgb};
pub use embassy_time::{Duration, Instant};

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// Writing a frame sets every pixel and latches it to the strip; failures are
/// not reported, the next frame simply overwrites the strip.
pub trait OutputDriver {
    /// Write colors to the LED strip
    fn write(&mut self, colors: &[Rgb]);
}
