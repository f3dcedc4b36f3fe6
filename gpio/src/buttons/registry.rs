use super::{ButtonConfig, ButtonError, ButtonHandle, ButtonState, PhysicalState, PressMode};
use log::debug;
use std::fmt::Debug;

/// A registered button and its debounce state.
#[derive(Clone, Debug)]
pub struct ButtonRecord<P> {
    pub(super) config: ButtonConfig<P>,
    pub(super) state: ButtonState,
    pub(super) physical_state: PhysicalState,
    /// Start of the current tracking window; `0` when not tracking.
    pub(super) first_change_timestamp: u32,
    /// Time of the last emitted event or tracking reset.
    pub(super) last_event_timestamp: u32,
    pub(super) handle: ButtonHandle,
}

impl<P> ButtonRecord<P> {
    pub fn config(&self) -> &ButtonConfig<P> {
        &self.config
    }

    pub fn pin(&self) -> &P {
        &self.config.pin
    }

    pub fn press_mode(&self) -> PressMode {
        self.config.press_mode
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// The pin state sampled on the last tick (or at registration).
    pub fn physical_state(&self) -> PhysicalState {
        self.physical_state
    }

    pub fn handle(&self) -> ButtonHandle {
        self.handle
    }

    /// Whether the button is inside a debounce or press tracking window.
    pub fn is_tracking(&self) -> bool {
        self.first_change_timestamp != 0
    }

    /// Whether a press was dispatched and the pin is still held.
    pub fn is_still_pressed(&self) -> bool {
        self.state != ButtonState::Idle && self.physical_state == PhysicalState::Active
    }
}

/// Fixed-capacity collection of [ButtonRecord]s.
///
/// Records are only ever appended; a record's index never changes.
#[derive(Debug)]
pub struct ButtonRegistry<P, const MAX_BUTTONS: usize> {
    buttons: heapless::Vec<ButtonRecord<P>, MAX_BUTTONS>,
}

impl<P: Debug, const MAX_BUTTONS: usize> ButtonRegistry<P, MAX_BUTTONS> {
    pub const fn new() -> Self {
        Self {
            buttons: heapless::Vec::new(),
        }
    }

    /// Appends a new idle button with the given initial pin state.
    ///
    /// # Errors
    /// - `ButtonError::CapacityExceeded` if `MAX_BUTTONS` buttons are already registered.
    ///   The registry is left unchanged.
    pub fn register(
        &mut self,
        config: ButtonConfig<P>,
        physical_state: PhysicalState,
    ) -> Result<ButtonHandle, ButtonError> {
        if self.buttons.is_full() {
            return Err(ButtonError::CapacityExceeded {
                capacity: MAX_BUTTONS,
            });
        }

        let handle = ButtonHandle(self.buttons.len());
        debug!(
            "Registering button #{} on {:?} ({:?})",
            handle.0, config.pin, config.press_mode
        );

        let record = ButtonRecord {
            config,
            state: ButtonState::Idle,
            physical_state,
            first_change_timestamp: 0,
            last_event_timestamp: 0,
            handle,
        };
        if self.buttons.push(record).is_err() {
            return Err(ButtonError::CapacityExceeded {
                capacity: MAX_BUTTONS,
            });
        }

        Ok(handle)
    }
}

impl<P, const MAX_BUTTONS: usize> ButtonRegistry<P, MAX_BUTTONS> {
    pub fn count(&self) -> usize {
        self.buttons.len()
    }

    pub const fn capacity(&self) -> usize {
        MAX_BUTTONS
    }

    /// Gets a registered button.
    ///
    /// # Panics
    /// If the handle was not issued by this registry.
    pub fn get(&self, handle: ButtonHandle) -> &ButtonRecord<P> {
        assert!(
            handle.0 < self.buttons.len(),
            "button handle #{} out of range ({} registered)",
            handle.0,
            self.buttons.len()
        );
        &self.buttons[handle.0]
    }

    /// All registered buttons, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ButtonRecord<P>> {
        self.buttons.iter()
    }

    pub(super) fn iter_mut(&mut self) -> impl Iterator<Item = &mut ButtonRecord<P>> {
        self.buttons.iter_mut()
    }
}

impl<P: Debug, const MAX_BUTTONS: usize> Default for ButtonRegistry<P, MAX_BUTTONS> {
    fn default() -> Self {
        Self::new()
    }
}
