//! Shared mocks for the button engine tests.

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use devkit_gpio::buttons::{ButtonConfig, ButtonEvent, Buttons, PhysicalState, PinStateProvider};
use devkit_gpio::clock::Clock;
use std::cell::Cell;

/// Timestamp the tests start at, clear of the startup re-arm guard.
pub const BASE: u32 = 10_000;

// ============================================================================
// Mock pins
// ============================================================================

/// Pins addressed by index, switched by the test between ticks.
#[derive(Debug, Default)]
pub struct MockPins {
    states: [Cell<bool>; 8],
    reads: Cell<usize>,
}

impl MockPins {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, pin: usize, active: bool) {
        self.states[pin].set(active);
    }

    /// Number of pin reads performed so far.
    pub fn reads(&self) -> usize {
        self.reads.get()
    }
}

impl PinStateProvider for MockPins {
    type Pin = usize;

    fn read_pin_state(&self, config: &ButtonConfig<usize>) -> PhysicalState {
        self.reads.set(self.reads.get() + 1);
        self.states[config.pin].get().into()
    }
}

pub type TestButtons<'a, const N: usize> = Buttons<&'a MockPins, N>;

// ============================================================================
// Mock clock
// ============================================================================

#[derive(Debug)]
pub struct MockClock {
    now: Cell<u32>,
}

impl MockClock {
    pub fn new(now: u32) -> Self {
        Self { now: Cell::new(now) }
    }

    pub fn set(&self, now: u32) {
        self.now.set(now);
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u32 {
        self.now.get()
    }
}

// ============================================================================
// Tick helpers
// ============================================================================

/// Runs a single tick and returns the events it produced.
pub fn tick_at<const N: usize>(buttons: &mut TestButtons<'_, N>, now: u32) -> Vec<ButtonEvent> {
    let mut events = Vec::new();
    buttons.tick(now, &mut events);
    events
}

/// Ticks every millisecond from `from` to `to` (inclusive, wrapping), collecting timestamped
/// events.
pub fn run<const N: usize>(
    buttons: &mut TestButtons<'_, N>,
    from: u32,
    to: u32,
) -> Vec<(u32, ButtonEvent)> {
    let mut events = Vec::new();
    let mut now = from;
    loop {
        for event in tick_at(buttons, now) {
            events.push((now, event));
        }
        if now == to {
            break;
        }
        now = now.wrapping_add(1);
    }
    events
}
