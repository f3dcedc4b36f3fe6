use crate::{GpioInput, GpioResult};
use log::trace;

/// Represents the direction of rotation for a rotary encoder.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RotEncRotation {
    Clockwise,
    CounterClockwise,
}

/// Which rotation direction counts up.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum IncrementDirection {
    #[default]
    Clockwise,
    CounterClockwise,
}

/// A quadrature rotary encoder driver reading two GPIO inputs.
///
/// Call [Self::update] on every change of pin A (from an edge interrupt or a fast enough polling
/// loop). One step is counted on each falling edge of A; the level of B at that moment gives the
/// direction.
///
/// Does not provide a button, so you may want to register the push switch with
/// [Buttons](crate::buttons::Buttons) separately.
#[derive(Debug)]
pub struct RotEnc<'a> {
    pub pin_a: &'a dyn GpioInput,
    pub pin_b: &'a dyn GpioInput,
    direction: IncrementDirection,
    last_a: bool,
    abs_count: i32,
    diff_count: i32,
}

impl<'a> RotEnc<'a> {
    pub fn new(pin_a: &'a dyn GpioInput, pin_b: &'a dyn GpioInput) -> Self {
        RotEnc {
            pin_a,
            pin_b,
            direction: IncrementDirection::Clockwise,
            last_a: false,
            abs_count: 0,
            diff_count: 0,
        }
    }

    pub fn with_direction(mut self, direction: IncrementDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn set_direction(&mut self, direction: IncrementDirection) {
        self.direction = direction;
    }

    pub fn direction(&self) -> IncrementDirection {
        self.direction
    }

    pub fn read_raw(&self) -> GpioResult<(bool, bool)> {
        let a = self.pin_a.read()?;
        let b = self.pin_b.read()?;
        Ok((a, b))
    }

    /// Samples both pins and counts a step if pin A has just fallen.
    pub fn update(&mut self) -> GpioResult<Option<RotEncRotation>> {
        let (a, b) = self.read_raw()?;

        if a == self.last_a {
            return Ok(None);
        }
        self.last_a = a;

        if a {
            return Ok(None);
        }

        let rotation = if b {
            RotEncRotation::CounterClockwise
        } else {
            RotEncRotation::Clockwise
        };

        let delta = match (rotation, self.direction) {
            (RotEncRotation::Clockwise, IncrementDirection::Clockwise)
            | (RotEncRotation::CounterClockwise, IncrementDirection::CounterClockwise) => 1,
            _ => -1,
        };
        self.diff_count += delta;
        self.abs_count += delta;

        trace!("{:?} step, count {}", rotation, self.abs_count);
        Ok(Some(rotation))
    }

    /// Gets the change since the last call, and clears it.
    pub fn count(&mut self) -> i32 {
        std::mem::take(&mut self.diff_count)
    }

    /// Gets the count accumulated since creation or the last [Self::reset_count].
    pub fn abs_count(&self) -> i32 {
        self.abs_count
    }

    /// Zeroes the absolute count.
    ///
    /// The pending difference is set so that the next [Self::count] reports the jump back to zero.
    pub fn reset_count(&mut self) {
        self.diff_count = -self.abs_count;
        self.abs_count = 0;
    }
}
