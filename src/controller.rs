//! Device control loop
//!
//! The controller owns the whole device state: settings record, renderer,
//! strip driver, settings store and the rate-limited task table. It is the
//! single writer of the settings; request handlers and the button call into
//! it synchronously, other contexts go through the intent mailbox.

use embassy_time::Instant;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::OutputDriver;
use crate::button::ButtonDebouncer;
use crate::config::StripConfig;
use crate::intent::{DeviceIntent, IntentInbox};
use crate::renderer::StripRenderer;
use crate::schedule::TimeOfDay;
use crate::settings::{Settings, SettingsPatch};
use crate::storage::{SettingsStore, StorageDriver};
use crate::tasks::{LOOP_TASK_COUNT, LoopTask, TaskTable, loop_tasks};

/// Device controller
pub struct Controller<'a, O, D, const MAX_LEDS: usize, const INTENTS: usize>
where
    O: OutputDriver,
    D: StorageDriver,
{
    // External dependencies and configuration
    config: StripConfig,
    output: O,
    store: SettingsStore<D>,
    inbox: IntentInbox<'a, INTENTS>,

    // Internal state
    settings: Settings,
    renderer: StripRenderer<MAX_LEDS>,
    tasks: TaskTable<LOOP_TASK_COUNT>,
    button: ButtonDebouncer,
}

impl<'a, O, D, const MAX_LEDS: usize, const INTENTS: usize> Controller<'a, O, D, MAX_LEDS, INTENTS>
where
    O: OutputDriver,
    D: StorageDriver,
{
    /// Boot the controller
    ///
    /// Loads the stored settings, falling back to defaults (and scheduling a
    /// save) when the store holds no valid record, then renders the first
    /// frame without a power fade.
    pub fn boot(
        config: StripConfig,
        mut store: SettingsStore<D>,
        output: O,
        inbox: IntentInbox<'a, INTENTS>,
        now: Instant,
    ) -> Self {
        let mut tasks = loop_tasks(&config);
        let settings = match store.load(config.temperature) {
            Ok(settings) => settings,
            Err(_error) => {
                #[cfg(feature = "esp32-log")]
                println!(
                    "[STORAGE] No valid saved settings ({:?}), using defaults",
                    _error
                );
                tasks.request(LoopTask::Persist, now);
                Settings::DEFAULT
            }
        }
        .clamped(config.temperature);

        let mut controller = Self {
            renderer: StripRenderer::new(&config, &settings),
            button: ButtonDebouncer::new(config.button_debounce),
            config,
            output,
            store,
            inbox,
            settings,
            tasks,
        };
        controller.render(now, true);
        controller
    }

    /// Apply a settings update, re-render immediately and schedule a save
    pub fn apply_patch(&mut self, patch: &SettingsPatch, now: Instant) -> &Settings {
        patch.apply(&mut self.settings, self.config.temperature);
        self.render(now, true);
        self.tasks.request(LoopTask::Persist, now);
        &self.settings
    }

    /// Flip the power state, re-render immediately and schedule a save
    pub fn toggle_power(&mut self, now: Instant) {
        self.settings.power = !self.settings.power;
        self.render(now, true);
        self.tasks.request(LoopTask::Persist, now);
    }

    /// Feed a raw button reading (`true` = pin high)
    ///
    /// A debounced press toggles the power. Returns `true` if it did.
    pub fn update_button(&mut self, level_high: bool, now: Instant) -> bool {
        if !self.button.update(level_high, now) {
            return false;
        }
        #[cfg(feature = "esp32-log")]
        println!("[BUTTON] Pressed, toggling power");
        self.toggle_power(now);
        true
    }

    /// Run one control loop iteration
    ///
    /// `local_time` is the wall clock time of day, or `None` while it is not
    /// synchronized yet. Never blocks.
    pub fn tick(&mut self, now: Instant, local_time: Option<TimeOfDay>) {
        self.process_intents(now);

        if self.renderer.is_fading() && self.tasks.poll(LoopTask::FadeFrame, now) {
            self.render(now, false);
        }

        if self.settings.schedule.enabled && self.tasks.poll(LoopTask::ScheduleCheck, now) {
            if let Some(time) = local_time {
                self.apply_schedule(time, now);
            }
        }

        if self.tasks.poll(LoopTask::Persist, now) {
            self.persist();
        }
    }

    /// Get the current settings
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Get the configuration
    pub const fn config(&self) -> &StripConfig {
        &self.config
    }

    /// Check if a power fade is in flight
    pub const fn is_fading(&self) -> bool {
        self.renderer.is_fading()
    }

    /// Check if a settings write is waiting for the quiet period
    pub fn save_pending(&self) -> bool {
        self.tasks.is_pending(LoopTask::Persist)
    }

    /// Get a reference to the renderer
    pub const fn renderer(&self) -> &StripRenderer<MAX_LEDS> {
        &self.renderer
    }

    /// Get a reference to the output driver
    pub const fn output(&self) -> &O {
        &self.output
    }

    /// Get a reference to the settings store
    pub const fn store(&self) -> &SettingsStore<D> {
        &self.store
    }

    /// Apply all queued intents
    fn process_intents(&mut self, now: Instant) {
        while let Some(intent) = self.inbox.take() {
            match intent {
                DeviceIntent::Apply(patch) => {
                    self.apply_patch(&patch, now);
                }
                DeviceIntent::TogglePower => self.toggle_power(now),
            }
        }
    }

    /// Switch power to what the schedule demands
    ///
    /// Schedule driven changes are not persisted, the schedule is evaluated
    /// again after a reboot.
    fn apply_schedule(&mut self, time: TimeOfDay, now: Instant) {
        let Some(power) = self.settings.schedule.power_at(time) else {
            return;
        };
        if power == self.settings.power {
            return;
        }
        #[cfg(feature = "esp32-log")]
        println!("[SCHEDULE] {} -> power={}", time, power);
        self.settings.power = power;
        self.render(now, true);
    }

    /// Render a frame and push it to the strip
    fn render(&mut self, now: Instant, _log: bool) {
        let frame = self.renderer.render(&self.settings, now);
        self.output.write(frame);

        #[cfg(feature = "esp32-log")]
        if _log {
            let color = self.renderer.last_color();
            println!(
                "[LED] Power={} Brightness={} Temp={}K Fade={} RGB=({},{},{}) MaxCurrent={}mA",
                u8::from(self.settings.power),
                self.settings.brightness,
                self.settings.temperature,
                self.renderer.last_scale(),
                color.r,
                color.g,
                color.b,
                self.config.max_current_ma
            );
        }
    }

    /// Write the settings record
    ///
    /// Failed writes are not retried, the next change schedules a new save.
    fn persist(&mut self) {
        let _saved = self.store.save(&self.settings).is_ok();

        #[cfg(feature = "esp32-log")]
        println!(
            "[STORAGE] Save {} (brightness={}, temp={}, power={})",
            if _saved { "OK" } else { "FAILED" },
            self.settings.brightness,
            self.settings.temperature,
            self.settings.power
        );
    }
}
