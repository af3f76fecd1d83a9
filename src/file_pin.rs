use log::debug;

use crate::control::{ControlSurface, SysfsControl};
use crate::error::{Error, Operation, Result};
use crate::pin::{Backend, Direction, Pin};
use crate::platform::Config;

/// A GPIO pin driven through a file-based [`ControlSurface`].
///
/// # Example
///
/// ```no_run
/// use gpio_file::{Direction, FilePin};
///
/// # fn main() -> gpio_file::Result<()> {
/// let mut button = FilePin::with_direction(17, Direction::In)?;
/// if button.read()? {
///     println!("pressed");
/// }
/// # Ok(())
/// # }
/// ```
pub type FilePin<S = SysfsControl> = Pin<FileBackend<S>>;

/// [`Backend`] translating pin operations into control-surface calls.
#[derive(Debug)]
pub struct FileBackend<S: ControlSurface> {
    surface: S,
}

impl<S: ControlSurface> FileBackend<S> {
    pub fn new(surface: S) -> Self {
        FileBackend { surface }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}

impl<S: ControlSurface> Backend for FileBackend<S> {
    fn apply_direction(&mut self, id: u32, direction: Direction) -> Result<()> {
        // check-then-export is racy; callers serialise access to a pin id
        let exported = self
            .surface
            .pin_is_exported(id)
            .map_err(Error::io(id, Operation::Export))?;
        if !exported {
            debug!("exporting GPIO pin {}", id);
            self.surface
                .export_pin(id)
                .map_err(Error::io(id, Operation::Export))?;
            self.surface
                .wait_for_node(id)
                .map_err(Error::io(id, Operation::Export))?;
        }

        self.surface
            .set_direction(id, direction)
            .map_err(Error::io(id, Operation::SetDirection))
    }

    fn write_value(&mut self, id: u32, value: bool) -> Result<()> {
        self.surface
            .write_value(id, encode_value(value))
            .map_err(Error::io(id, Operation::WriteValue))
    }

    fn read_value(&mut self, id: u32) -> Result<bool> {
        let raw = self
            .surface
            .read_value(id)
            .map_err(Error::io(id, Operation::ReadValue))?;
        Ok(decode_value(&raw))
    }

    fn release(&mut self, id: u32) -> Result<()> {
        debug!("unexporting GPIO pin {}", id);
        self.surface
            .unexport_pin(id)
            .map_err(Error::io(id, Operation::Unexport))
    }
}

fn encode_value(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

// Only the first character matters, so trailing newlines are fine and an
// empty file reads as low.
fn decode_value(raw: &str) -> bool {
    raw.starts_with('1')
}

impl FilePin<SysfsControl> {
    /// Claims pin `id` as an output driven low, using [`Config::from_env`].
    pub fn output(id: u32) -> Result<Self> {
        Self::open(id, Direction::Out, false)
    }

    /// Claims pin `id` with `direction` and an initial value of `false`,
    /// using [`Config::from_env`].
    pub fn with_direction(id: u32, direction: Direction) -> Result<Self> {
        Self::open(id, direction, false)
    }

    /// Claims pin `id` using [`Config::from_env`].
    ///
    /// # Arguments
    ///
    /// * `id` - The kernel GPIO number of the pin.
    /// * `direction` - `Direction::In` or `Direction::Out`
    /// * `initial_value` - The level driven on an output pin.
    pub fn open(id: u32, direction: Direction, initial_value: bool) -> Result<Self> {
        Self::with_config(id, direction, initial_value, &Config::from_env())
    }

    /// Claims pin `id` on the control surface selected by `config`.
    ///
    /// # Arguments
    ///
    /// * `id` - The kernel GPIO number of the pin.
    /// * `direction` - `Direction::In` or `Direction::Out`
    /// * `initial_value` - The level driven on an output pin.
    /// * `config` - Selects the control-surface root and export timeout.
    pub fn with_config(
        id: u32,
        direction: Direction,
        initial_value: bool,
        config: &Config,
    ) -> Result<Self> {
        Self::with_surface(id, direction, initial_value, SysfsControl::from_config(config))
    }
}

impl<S: ControlSurface> FilePin<S> {
    /// Claims pin `id` on an explicit control surface.
    ///
    /// # Arguments
    ///
    /// * `id` - The kernel GPIO number of the pin.
    /// * `direction` - `Direction::In` or `Direction::Out`
    /// * `initial_value` - The level driven on an output pin.
    /// * `surface` - The control surface the pin is exported on.
    pub fn with_surface(
        id: u32,
        direction: Direction,
        initial_value: bool,
        surface: S,
    ) -> Result<Self> {
        Pin::new(id, direction, initial_value, FileBackend::new(surface))
    }

    pub fn surface(&self) -> &S {
        self.backend().surface()
    }
}
