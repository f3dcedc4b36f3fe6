//! Software-backed GPIO input.
//!
//! Useful for simulation and tests, where no real hardware line exists.
use crate::{GpioActiveLevel, GpioInput, GpioResult};
use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};

/// An in-memory input line.
///
/// Holds the raw electrical level. The active level is applied in software on every read,
/// the same way a hardware backend would apply it.
pub struct SoftInput {
    name: &'static str,
    level: AtomicBool,
    active_level: GpioActiveLevel,
}

impl SoftInput {
    /// Creates a new line at the idle electrical level for the given active level.
    pub fn new(name: &'static str, active_level: GpioActiveLevel) -> Self {
        Self {
            name,
            level: AtomicBool::new(active_level.get_state(false)),
            active_level,
        }
    }

    /// Sets the raw electrical level of the line.
    pub fn set_level(&self, high: bool) {
        self.level.store(high, Ordering::Relaxed);
    }

    /// Drives the line so that it reads as asserted (`true`) or released (`false`).
    pub fn set_active(&self, active: bool) {
        self.set_level(self.active_level.get_state(active));
    }

    pub fn level(&self) -> bool {
        self.level.load(Ordering::Relaxed)
    }
}

impl Debug for SoftInput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "SoftInput({})", self.name)
    }
}

impl GpioInput for SoftInput {
    fn read(&self) -> GpioResult<bool> {
        Ok(self.active_level.get_state(self.level()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_low_line_idles_high() {
        let input = SoftInput::new("btn", GpioActiveLevel::Low);
        assert!(input.level());
        assert_eq!(input.read(), Ok(false));

        input.set_active(true);
        assert!(!input.level());
        assert_eq!(input.read(), Ok(true));
    }

    #[test]
    fn raw_level_follows_active_level() {
        let input = SoftInput::new("btn", GpioActiveLevel::High);
        input.set_level(true);
        assert_eq!(input.read(), Ok(true));
        input.set_level(false);
        assert_eq!(input.read(), Ok(false));
    }
}
