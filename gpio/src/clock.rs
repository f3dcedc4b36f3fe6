//! Millisecond clock sources.

use std::fmt::Debug;
use std::time::Instant;

/// A monotonically non-decreasing millisecond counter.
///
/// The counter is 32 bits wide and is allowed to wrap around (after ~49.7 days).
/// Consumers compare instants with wrapping subtraction.
pub trait Clock: Debug {
    /// Gets the current time in milliseconds.
    fn now_ms(&self) -> u32;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}

/// Clock counting milliseconds since its creation, backed by [Instant].
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u32 {
        // Truncation is the wraparound.
        self.start.elapsed().as_millis() as u32
    }
}
