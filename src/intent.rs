//! Device intents
//!
//! Mutations requested from outside the control loop (button interrupts,
//! network tasks on a multi-threaded host) are posted to an [`IntentMailbox`]
//! and applied by the control loop, which stays the only writer of the
//! settings record.
//!
//! The mailbox is a bounded queue guarded by `critical-section`, so posting is
//! safe from interrupt handlers and other threads.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

use crate::settings::SettingsPatch;

/// Requested change of the device state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceIntent {
    /// Apply a partial settings update
    Apply(SettingsPatch),
    /// Flip the power state
    TogglePower,
}

/// Error returned when posting to a full mailbox. Holds the rejected intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MailboxFull(pub DeviceIntent);

/// Bounded queue of pending intents
pub struct IntentMailbox<const SIZE: usize> {
    inner: Mutex<RefCell<Deque<DeviceIntent, SIZE>>>,
}

impl<const SIZE: usize> IntentMailbox<SIZE> {
    /// Create an empty mailbox. Usable in `static` items.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Get a posting handle
    pub const fn poster(&self) -> IntentPoster<'_, SIZE> {
        IntentPoster { mailbox: self }
    }

    /// Get the handle the control loop drains
    pub const fn inbox(&self) -> IntentInbox<'_, SIZE> {
        IntentInbox { mailbox: self }
    }

    /// Queue an intent
    pub fn post(&self, intent: DeviceIntent) -> Result<(), MailboxFull> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.push_back(intent).map_err(MailboxFull)
        })
    }

    /// Take the oldest queued intent
    pub fn take(&self) -> Option<DeviceIntent> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().pop_front())
    }

    /// Number of queued intents
    pub fn pending(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().len())
    }
}

impl<const SIZE: usize> Default for IntentMailbox<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// Posting handle of an [`IntentMailbox`]
#[derive(Clone, Copy)]
pub struct IntentPoster<'a, const SIZE: usize> {
    mailbox: &'a IntentMailbox<SIZE>,
}

impl<const SIZE: usize> IntentPoster<'_, SIZE> {
    /// Queue an intent
    pub fn post(&self, intent: DeviceIntent) -> Result<(), MailboxFull> {
        self.mailbox.post(intent)
    }
}

/// Draining handle of an [`IntentMailbox`]
#[derive(Clone, Copy)]
pub struct IntentInbox<'a, const SIZE: usize> {
    mailbox: &'a IntentMailbox<SIZE>,
}

impl<const SIZE: usize> IntentInbox<'_, SIZE> {
    /// Take the oldest queued intent
    pub fn take(&self) -> Option<DeviceIntent> {
        self.mailbox.take()
    }
}
