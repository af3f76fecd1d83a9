use log::warn;
use std::{fmt, str::FromStr};

use crate::error::{Error, Result};

/// Specifies the GPIO pin direction.
///
/// * `In` - Input
/// * `Out` - Output
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    /// The control-surface spelling of the direction, `"in"` or `"out"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in" => Ok(Direction::In),
            "out" => Ok(Direction::Out),
            _ => Err(Error::InvalidDirection(s.to_string())),
        }
    }
}

/// The hardware side of a [`Pin`].
///
/// A backend is only ever called for open pins; the disposed checks live in
/// [`Pin`].
pub trait Backend {
    /// Makes `direction` effective for pin `id`, registering the pin first
    /// if necessary.
    fn apply_direction(&mut self, id: u32, direction: Direction) -> Result<()>;

    fn write_value(&mut self, id: u32, value: bool) -> Result<()>;

    fn read_value(&mut self, id: u32) -> Result<bool>;

    /// Reverses the registration done by `apply_direction`.
    fn release(&mut self, id: u32) -> Result<()>;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    Open { direction: Direction, value: bool },
    Closed,
}

/// A single GPIO line.
///
/// The cached direction and value are only updated once the backend has
/// accepted the change, so after a failed call they still describe the last
/// successful operation.
///
/// Writing to a pin configured as an input is passed through to the backend
/// unchecked.
///
/// A pin still open when dropped is released; errors from that release are
/// logged and otherwise ignored. Call [`Pin::release`] to observe them.
#[derive(Debug)]
pub struct Pin<B: Backend> {
    id: u32,
    state: State,
    backend: B,
}

impl<B: Backend> Pin<B> {
    /// Claims pin `id` with the given direction.
    ///
    /// The direction is always applied, even if the line is already
    /// configured that way. Output pins are then driven to `initial_value`.
    /// If either step fails the half-claimed pin is released before the error
    /// is returned.
    ///
    /// # Arguments
    ///
    /// * `id` - The kernel GPIO number of the pin.
    /// * `direction` - `Direction::In` or `Direction::Out`
    /// * `initial_value` - The level driven on an output pin. Only cached for inputs.
    /// * `backend` - The hardware side the pin delegates to.
    pub fn new(id: u32, direction: Direction, initial_value: bool, backend: B) -> Result<Self> {
        let mut pin = Pin {
            id,
            state: State::Open {
                direction,
                value: initial_value,
            },
            backend,
        };
        // an early return drops `pin`, which releases it
        pin.backend.apply_direction(id, direction)?;
        if direction == Direction::Out {
            pin.write(initial_value)?;
        }
        Ok(pin)
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, State::Open { .. })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn direction(&self) -> Result<Direction> {
        match self.state {
            State::Open { direction, .. } => Ok(direction),
            State::Closed => Err(self.disposed()),
        }
    }

    /// The value of the last successful [`write`](Pin::write) or
    /// [`read`](Pin::read).
    pub fn value(&self) -> Result<bool> {
        match self.state {
            State::Open { value, .. } => Ok(value),
            State::Closed => Err(self.disposed()),
        }
    }

    /// Changes the direction of the pin. Does nothing if it is unchanged.
    pub fn set_direction(&mut self, new: Direction) -> Result<()> {
        match self.state {
            State::Closed => Err(self.disposed()),
            State::Open { direction, .. } if direction == new => Ok(()),
            State::Open { value, .. } => {
                self.backend.apply_direction(self.id, new)?;
                self.state = State::Open {
                    direction: new,
                    value,
                };
                Ok(())
            }
        }
    }

    pub fn write(&mut self, value: bool) -> Result<()> {
        match self.state {
            State::Closed => Err(self.disposed()),
            State::Open { direction, .. } => {
                self.backend.write_value(self.id, value)?;
                self.state = State::Open { direction, value };
                Ok(())
            }
        }
    }

    /// Reads the current level of the line.
    pub fn read(&mut self) -> Result<bool> {
        match self.state {
            State::Closed => Err(self.disposed()),
            State::Open { direction, .. } => {
                let value = self.backend.read_value(self.id)?;
                self.state = State::Open { direction, value };
                Ok(value)
            }
        }
    }

    /// Releases the pin.
    ///
    /// The pin is closed even if the backend fails to release it. Releasing a
    /// closed pin returns [`Error::Disposed`].
    pub fn release(&mut self) -> Result<()> {
        match self.state {
            State::Closed => Err(self.disposed()),
            State::Open { .. } => {
                self.state = State::Closed;
                self.backend.release(self.id)
            }
        }
    }

    fn disposed(&self) -> Error {
        Error::Disposed { pin: self.id }
    }
}

impl<B: Backend> Drop for Pin<B> {
    fn drop(&mut self) {
        if self.is_open() {
            if let Err(e) = self.release() {
                warn!("Failed to release GPIO pin {}: {}", self.id, e);
            }
        }
    }
}
