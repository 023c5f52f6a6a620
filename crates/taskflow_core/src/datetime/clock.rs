//! Injectable source of "today".
//!
//! The store and calendar never read the OS clock directly; callers pick
//! `SystemClock` in production and `FixedClock` in tests.

use super::key::DateKey;
use chrono::Local;

/// Supplies the current local calendar date.
pub trait Clock {
    fn today(&self) -> DateKey;
}

/// Local wall-clock dates for production use.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> DateKey {
        DateKey::from_naive(Local::now().date_naive())
    }
}

/// Deterministic clock pinned to one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateKey);

impl FixedClock {
    pub fn new(today: DateKey) -> Self {
        Self(today)
    }
}

impl Clock for FixedClock {
    fn today(&self) -> DateKey {
        self.0
    }
}
