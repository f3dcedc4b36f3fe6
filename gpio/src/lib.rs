pub mod buttons;
pub mod clock;
pub mod gpiod;
pub mod rotenc;
pub mod soft;

use std::fmt::Debug;
use thiserror::Error;

#[derive(Debug, Error, Eq, PartialEq, Clone)]
pub enum GpioError {
    #[error("pin already in use")]
    AlreadyInUse,
    #[error("invalid argument")]
    InvalidArgument,
    #[error("the feature is not supported on this backend")]
    NotSupported,
    #[error("IO error: {0}")]
    Io(std::io::ErrorKind),
    #[error("error: {0}")]
    Other(String),
}

impl From<std::io::Error> for GpioError {
    fn from(err: std::io::Error) -> Self {
        GpioError::Io(err.kind())
    }
}

pub type GpioResult<T> = Result<T, GpioError>;

pub trait GpioDriver: Debug {
    /// Gets the amount of GPIO lines available.
    fn count(&self) -> GpioResult<usize>;

    /// Requests the GPIO line at the given index as an input.
    ///
    /// The line stays reserved until the returned input is dropped.
    ///
    /// # Errors
    /// - `GpioError::InvalidArgument` if the index is out of range.
    /// - `GpioError::AlreadyInUse` if the line has already been handed out.
    fn get_input(
        &self,
        index: usize,
        active_level: GpioActiveLevel,
        bias: GpioBias,
    ) -> GpioResult<Box<dyn GpioInput + '_>>;
}

/// Specifies the active level of the GPIO pin.
///
/// By default, the active level is high. Buttons wired to ground with a pull-up
/// resistor are active low.
///
/// Might be software-implemented.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum GpioActiveLevel {
    #[default] High,
    Low,
}

impl GpioActiveLevel {
    /// Converts between the electrical level and the logical (asserted) state.
    ///
    /// The mapping is its own inverse, so it works in both directions.
    pub fn get_state(&self, value: bool) -> bool {
        match self {
            GpioActiveLevel::High => value,
            GpioActiveLevel::Low => !value,
        }
    }
}

/// Specifies the bias of the GPIO pin.
///
/// You can use this to enable pull-up or pull-down resistors.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum GpioBias {
    #[default] None,
    PullUp,
    PullDown,
}

pub trait GpioInput: Debug {
    /// Reads the logical state of the GPIO pin.
    ///
    /// `true` means asserted, with the active level already applied.
    fn read(&self) -> GpioResult<bool>;
}
