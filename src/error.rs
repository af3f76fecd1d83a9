use std::{fmt, io};

/// Result type returned by pin operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by [`Pin`](crate::Pin) operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The pin has already been released.
    #[error("GPIO pin {pin} has been released")]
    Disposed { pin: u32 },

    /// A control-surface call failed.
    #[error("GPIO pin {pin}: {operation} failed: {source}")]
    Io {
        pin: u32,
        operation: Operation,
        #[source]
        source: io::Error,
    },

    /// A direction string was neither `in` nor `out`.
    #[error("invalid direction: {0:?}")]
    InvalidDirection(String),
}

impl Error {
    pub(crate) fn io(pin: u32, operation: Operation) -> impl FnOnce(io::Error) -> Error {
        move |source| Error::Io {
            pin,
            operation,
            source,
        }
    }

    /// Returns `true` if the error was caused by using a released pin.
    pub fn is_disposed(&self) -> bool {
        matches!(self, Error::Disposed { .. })
    }
}

/// Identifies the control-surface call that failed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Operation {
    Export,
    Unexport,
    SetDirection,
    WriteValue,
    ReadValue,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Export => "export",
            Operation::Unexport => "unexport",
            Operation::SetDirection => "set_direction",
            Operation::WriteValue => "write_value",
            Operation::ReadValue => "read_value",
        };
        write!(f, "{}", name)
    }
}

impl embedded_hal::digital::Error for Error {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}
