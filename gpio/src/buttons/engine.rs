use super::{
    ButtonConfig, ButtonError, ButtonHandle, ButtonHandler, ButtonRecord, ButtonRegistry,
    ButtonState, ButtonTiming, PhysicalState, PinStateProvider, PressMode,
};
use crate::clock::Clock;
use log::trace;
use std::fmt::{Debug, Formatter};

/// Debounce and dispatch engine for up to `MAX_BUTTONS` buttons.
///
/// Owns the pin provider and the registry. Meant to be driven from a single context
/// (main loop or one timer callback) by calling [Self::tick] every 1-10 ms.
pub struct Buttons<R: PinStateProvider, const MAX_BUTTONS: usize> {
    provider: R,
    registry: ButtonRegistry<R::Pin, MAX_BUTTONS>,
    timing: ButtonTiming,
}

impl<R, const MAX_BUTTONS: usize> Buttons<R, MAX_BUTTONS>
where
    R: PinStateProvider,
    R::Pin: Debug,
{
    pub fn new(provider: R) -> Self {
        Self {
            provider,
            registry: ButtonRegistry::new(),
            timing: ButtonTiming::DEFAULT,
        }
    }

    pub fn with_timing(mut self, timing: ButtonTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn timing(&self) -> &ButtonTiming {
        &self.timing
    }

    pub fn provider(&self) -> &R {
        &self.provider
    }

    /// Registers a button, sampling its pin immediately.
    ///
    /// # Errors
    /// - `ButtonError::CapacityExceeded` if `MAX_BUTTONS` buttons are already registered.
    pub fn register(
        &mut self,
        pin: R::Pin,
        press_mode: PressMode,
    ) -> Result<ButtonHandle, ButtonError> {
        if self.registry.count() >= MAX_BUTTONS {
            return Err(ButtonError::CapacityExceeded {
                capacity: MAX_BUTTONS,
            });
        }

        let config = ButtonConfig { pin, press_mode };
        let physical_state = self.provider.read_pin_state(&config);
        self.registry.register(config, physical_state)
    }

    /// Number of registered buttons.
    pub fn count(&self) -> usize {
        self.registry.count()
    }

    /// Gets a registered button.
    ///
    /// # Panics
    /// If the handle was not issued by this engine.
    pub fn button(&self, handle: ButtonHandle) -> &ButtonRecord<R::Pin> {
        self.registry.get(handle)
    }

    pub fn buttons(&self) -> impl Iterator<Item = &ButtonRecord<R::Pin>> {
        self.registry.iter()
    }

    /// Whether a press has been dispatched for the button and it is still physically held,
    /// as of the last tick.
    ///
    /// # Panics
    /// If the handle was not issued by this engine.
    pub fn is_still_pressed(&self, handle: ButtonHandle) -> bool {
        self.registry.get(handle).is_still_pressed()
    }

    /// Samples the clock and advances all buttons by one tick.
    pub fn poll<C, H>(&mut self, clock: &C, handler: &mut H)
    where
        C: Clock + ?Sized,
        H: ButtonHandler<R::Pin> + ?Sized,
    {
        self.tick(clock.now_ms(), handler)
    }

    /// Advances every button, in registration order, by one tick at time `now` (ms).
    ///
    /// Events are delivered to `handler` before this returns.
    pub fn tick<H>(&mut self, now: u32, handler: &mut H)
    where
        H: ButtonHandler<R::Pin> + ?Sized,
    {
        let timing = self.timing;
        for button in self.registry.iter_mut() {
            let phy = self.provider.read_pin_state(&button.config);
            Self::step(button, phy, now, &timing, handler);
        }
    }

    fn step<H>(
        button: &mut ButtonRecord<R::Pin>,
        phy: PhysicalState,
        now: u32,
        timing: &ButtonTiming,
        handler: &mut H,
    ) where
        H: ButtonHandler<R::Pin> + ?Sized,
    {
        button.physical_state = phy;

        let since_first = now.wrapping_sub(button.first_change_timestamp);
        let since_last = now.wrapping_sub(button.last_event_timestamp);

        if button.first_change_timestamp == 0 {
            if phy == PhysicalState::Active && since_last > timing.after_press_ms {
                trace!("Button #{}: tracking from {}", button.handle.0, now);
                button.first_change_timestamp = now;
            }
            return;
        }

        match (phy, button.state) {
            (PhysicalState::Active, ButtonState::Idle) => {
                if since_first > timing.press_ms {
                    trace!("Button #{}: pressed at {}", button.handle.0, now);
                    button.state = ButtonState::Pressed;
                    handler.on_press(button);
                    button.last_event_timestamp = now;
                }
            }
            (PhysicalState::Active, ButtonState::Pressed) => match button.config.press_mode {
                PressMode::LongPress => {
                    if since_first > timing.longpress_ms {
                        trace!("Button #{}: long-pressed at {}", button.handle.0, now);
                        button.state = ButtonState::LongPressed;
                        handler.on_longpress(button);
                        button.last_event_timestamp = now;
                    }
                }
                PressMode::Repetitive => {
                    if since_last > timing.repetitive_ms {
                        trace!("Button #{}: repeated at {}", button.handle.0, now);
                        handler.on_press(button);
                        button.last_event_timestamp = now;
                    }
                }
                PressMode::SinglePress => {}
            },
            // Long press never repeats.
            (PhysicalState::Active, ButtonState::LongPressed) => {}
            (PhysicalState::Idle, ButtonState::Idle) => {
                // Still debouncing until the window elapses, then it was a glitch.
                if since_first > timing.press_ms {
                    trace!("Button #{}: glitch discarded at {}", button.handle.0, now);
                    button.first_change_timestamp = 0;
                    button.last_event_timestamp = now;
                }
            }
            (PhysicalState::Idle, ButtonState::Pressed | ButtonState::LongPressed) => {
                trace!("Button #{}: released at {}", button.handle.0, now);
                handler.on_release(button);
                button.state = ButtonState::Idle;
                button.first_change_timestamp = 0;
                button.last_event_timestamp = now;
            }
        }
    }
}

impl<R, const MAX_BUTTONS: usize> Debug for Buttons<R, MAX_BUTTONS>
where
    R: PinStateProvider,
    R::Pin: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Buttons({}/{}, {:?})",
            self.registry.count(),
            MAX_BUTTONS,
            self.timing
        )
    }
}
