//! Debounced button events.
//!
//! A [Buttons] engine owns a fixed-capacity registry of buttons and advances a small state
//! machine for each of them every time [Buttons::tick] is called. Each button has a
//! [PressMode] deciding what happens while it is held:
//!
//! - [PressMode::SinglePress]: one `on_press` per physical press.
//! - [PressMode::Repetitive]: `on_press` keeps firing every [ButtonTiming::repetitive_ms].
//! - [PressMode::LongPress]: after `on_press`, a single `on_longpress` once the button has been
//!   held for [ButtonTiming::longpress_ms].
//!
//! Every confirmed press ends with exactly one `on_release`.
//!
//! All thresholds are strict: an event fires on the first tick *past* the threshold, never on
//! the boundary tick itself.
//!
//! Timestamps are 32-bit milliseconds and are compared with wrapping subtraction, so the counter
//! may roll over as long as compared instants are less than 2^32 ms apart.

mod engine;
mod registry;

use crate::GpioInput;
use log::warn;
use std::marker::PhantomData;
use thiserror::Error;

pub use engine::*;
pub use registry::*;

/// How a held button generates events.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum PressMode {
    /// Only one `on_press` per press.
    #[default]
    SinglePress,
    /// `on_press` is repeated while the button is held.
    Repetitive,
    /// `on_press`, then a single `on_longpress` once held long enough.
    LongPress,
}

/// Debounced logical state of a button.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ButtonState {
    #[default]
    Idle,
    Pressed,
    LongPressed,
}

/// Raw, undebounced state of a button pin.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum PhysicalState {
    #[default]
    Idle,
    Active,
}

impl PhysicalState {
    pub fn is_active(self) -> bool {
        self == PhysicalState::Active
    }
}

impl From<bool> for PhysicalState {
    fn from(active: bool) -> Self {
        if active {
            PhysicalState::Active
        } else {
            PhysicalState::Idle
        }
    }
}

/// Identifies one physical button. Immutable after registration.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ButtonConfig<P> {
    /// Provider-specific reference to the pin. Never interpreted by the engine.
    pub pin: P,
    pub press_mode: PressMode,
}

/// Handle to a registered button; the position in the registry.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ButtonHandle(usize);

impl ButtonHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Timing thresholds, all in milliseconds.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ButtonTiming {
    /// Time the pin has to stay active before a press is confirmed (debounce window).
    pub press_ms: u32,
    /// Time after the last event or reset before new tracking may start.
    ///
    /// Does not affect repetitive-mode pacing.
    pub after_press_ms: u32,
    /// Hold time, counted from the start of tracking, for [PressMode::LongPress].
    pub longpress_ms: u32,
    /// Interval between repeated presses for [PressMode::Repetitive].
    pub repetitive_ms: u32,
}

impl ButtonTiming {
    pub const DEFAULT: ButtonTiming = ButtonTiming {
        press_ms: 30,
        after_press_ms: 15,
        longpress_ms: 2000,
        repetitive_ms: 500,
    };
}

impl Default for ButtonTiming {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Copy, Clone, Debug, Error, Eq, PartialEq)]
pub enum ButtonError {
    #[error("button registry is full (capacity {capacity})")]
    CapacityExceeded { capacity: usize },
}

/// Event emitted by the engine, as recorded by the `Vec<ButtonEvent>` handler.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ButtonEvent {
    Press(ButtonHandle),
    LongPress(ButtonHandle),
    Release(ButtonHandle),
}

impl ButtonEvent {
    pub fn handle(self) -> ButtonHandle {
        match self {
            ButtonEvent::Press(handle)
            | ButtonEvent::LongPress(handle)
            | ButtonEvent::Release(handle) => handle,
        }
    }
}

/// Source of physical pin states.
pub trait PinStateProvider {
    /// Pin reference type stored in [ButtonConfig].
    type Pin;

    /// Samples the current electrical state of the button's pin.
    ///
    /// Must not debounce. Read failures must be handled here; the engine only ever sees a state.
    fn read_pin_state(&self, config: &ButtonConfig<Self::Pin>) -> PhysicalState;
}

impl<T: PinStateProvider + ?Sized> PinStateProvider for &T {
    type Pin = T::Pin;

    fn read_pin_state(&self, config: &ButtonConfig<Self::Pin>) -> PhysicalState {
        (**self).read_pin_state(config)
    }
}

/// Reads buttons wired to [GpioInput] lines.
///
/// A failed read is logged and sampled as [PhysicalState::Idle], so a flaky line can end a press
/// but never start one.
#[derive(Debug, Default, Clone, Copy)]
pub struct GpioPinReader<'a> {
    _pins: PhantomData<&'a dyn GpioInput>,
}

impl GpioPinReader<'_> {
    pub fn new() -> Self {
        Self { _pins: PhantomData }
    }
}

impl<'a> PinStateProvider for GpioPinReader<'a> {
    type Pin = &'a dyn GpioInput;

    fn read_pin_state(&self, config: &ButtonConfig<Self::Pin>) -> PhysicalState {
        match config.pin.read() {
            Ok(active) => active.into(),
            Err(e) => {
                warn!("Failed to read {:?}: {}", config.pin, e);
                PhysicalState::Idle
            }
        }
    }
}

/// Receives button events.
///
/// Called synchronously from within [Buttons::tick], in registration order.
/// All methods default to doing nothing.
pub trait ButtonHandler<P> {
    /// A press was confirmed, or repeated in [PressMode::Repetitive].
    fn on_press(&mut self, _button: &ButtonRecord<P>) {}

    /// The long-press threshold was crossed in [PressMode::LongPress].
    fn on_longpress(&mut self, _button: &ButtonRecord<P>) {}

    /// A confirmed press (of any kind) has physically ended.
    fn on_release(&mut self, _button: &ButtonRecord<P>) {}
}

impl<P, H: ButtonHandler<P> + ?Sized> ButtonHandler<P> for &mut H {
    fn on_press(&mut self, button: &ButtonRecord<P>) {
        (**self).on_press(button)
    }

    fn on_longpress(&mut self, button: &ButtonRecord<P>) {
        (**self).on_longpress(button)
    }

    fn on_release(&mut self, button: &ButtonRecord<P>) {
        (**self).on_release(button)
    }
}

impl<P> ButtonHandler<P> for Vec<ButtonEvent> {
    fn on_press(&mut self, button: &ButtonRecord<P>) {
        self.push(ButtonEvent::Press(button.handle()));
    }

    fn on_longpress(&mut self, button: &ButtonRecord<P>) {
        self.push(ButtonEvent::LongPress(button.handle()));
    }

    fn on_release(&mut self, button: &ButtonRecord<P>) {
        self.push(ButtonEvent::Release(button.handle()));
    }
}

/// Handler that ignores all events.
impl<P> ButtonHandler<P> for () {}
