//! Rate-limited control loop tasks
//!
//! The control loop never sleeps inside a task. Instead every periodic duty
//! is described by a [`RateLimit`] and polled on each loop iteration; a task
//! only runs when its limit says it is due.

use embassy_time::{Duration, Instant};

use crate::config::StripConfig;

/// Number of tasks in the control loop table
pub const LOOP_TASK_COUNT: usize = 3;

/// Duties of the control loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopTask {
    /// Render the next power fade frame
    FadeFrame,
    /// Compare the power state with the schedule
    ScheduleCheck,
    /// Commit the settings record to storage
    Persist,
}

/// Timing rule of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimit {
    /// Due at most once per `interval`
    Periodic {
        interval: Duration,
        last_run: Option<Instant>,
    },
    /// Due once, `delay` after the latest request
    ///
    /// Requests arriving before the task ran push the deadline back, so a
    /// burst of requests results in a single run.
    Debounced {
        delay: Duration,
        requested_at: Option<Instant>,
    },
}

impl RateLimit {
    pub const fn periodic(interval: Duration) -> Self {
        Self::Periodic {
            interval,
            last_run: None,
        }
    }

    pub const fn debounced(delay: Duration) -> Self {
        Self::Debounced {
            delay,
            requested_at: None,
        }
    }

    /// Arm a debounced task. Periodic tasks ignore requests.
    pub fn request(&mut self, now: Instant) {
        if let Self::Debounced { requested_at, .. } = self {
            *requested_at = Some(now);
        }
    }

    /// Check if the task is due at `now`, and mark it as run if it is
    pub fn poll(&mut self, now: Instant) -> bool {
        match self {
            Self::Periodic { interval, last_run } => {
                let due = match *last_run {
                    None => true,
                    Some(last) => now.saturating_duration_since(last) >= *interval,
                };
                if due {
                    *last_run = Some(now);
                }
                due
            }
            Self::Debounced {
                delay,
                requested_at,
            } => {
                let Some(requested) = *requested_at else {
                    return false;
                };
                if now.saturating_duration_since(requested) < *delay {
                    return false;
                }
                *requested_at = None;
                true
            }
        }
    }

    /// Check if a debounced task is armed
    pub const fn is_pending(&self) -> bool {
        match self {
            Self::Periodic { .. } => false,
            Self::Debounced { requested_at, .. } => requested_at.is_some(),
        }
    }
}

/// Task table entry
#[derive(Debug, Clone, Copy)]
pub struct ScheduledTask {
    pub task: LoopTask,
    pub limit: RateLimit,
}

/// Table of rate-limited tasks polled by the control loop
#[derive(Debug, Clone)]
pub struct TaskTable<const N: usize> {
    entries: [ScheduledTask; N],
}

impl<const N: usize> TaskTable<N> {
    pub const fn new(entries: [ScheduledTask; N]) -> Self {
        Self { entries }
    }

    /// Arm a debounced task
    pub fn request(&mut self, task: LoopTask, now: Instant) {
        if let Some(limit) = self.limit_mut(task) {
            limit.request(now);
        }
    }

    /// Check if `task` is due at `now`, and mark it as run if it is
    ///
    /// Unknown tasks are never due.
    pub fn poll(&mut self, task: LoopTask, now: Instant) -> bool {
        self.limit_mut(task).is_some_and(|limit| limit.poll(now))
    }

    /// Check if a debounced task is armed
    pub fn is_pending(&self, task: LoopTask) -> bool {
        self.entries
            .iter()
            .find(|entry| entry.task == task)
            .is_some_and(|entry| entry.limit.is_pending())
    }

    fn limit_mut(&mut self, task: LoopTask) -> Option<&mut RateLimit> {
        self.entries
            .iter_mut()
            .find(|entry| entry.task == task)
            .map(|entry| &mut entry.limit)
    }
}

/// Task table of the device control loop
pub const fn loop_tasks(config: &StripConfig) -> TaskTable<LOOP_TASK_COUNT> {
    TaskTable::new([
        ScheduledTask {
            task: LoopTask::FadeFrame,
            limit: RateLimit::periodic(config.fade_frame_interval),
        },
        ScheduledTask {
            task: LoopTask::ScheduleCheck,
            limit: RateLimit::periodic(config.schedule_check_interval),
        },
        ScheduledTask {
            task: LoopTask::Persist,
            limit: RateLimit::debounced(config.save_delay),
        },
    ])
}
