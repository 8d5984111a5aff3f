//! Wall-clock source for missed-call timestamps.

use chrono::{Local, Timelike};

/// Supplies the local hour and minute.
pub trait Clock: Send + Sync {
    /// Current `(hour, minute)` in local time.
    fn hour_minute(&self) -> (u32, u32);
}

/// The server's local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn hour_minute(&self) -> (u32, u32) {
        let now = Local::now();
        (now.hour(), now.minute())
    }
}

/// A clock stuck at one time of day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub hour: u32,
    pub minute: u32,
}

impl FixedClock {
    pub fn new(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }
}

impl Clock for FixedClock {
    fn hour_minute(&self) -> (u32, u32) {
        (self.hour, self.minute)
    }
}
