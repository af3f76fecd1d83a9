//! Access to GPIO pins through a file-based control surface such as the
//! Linux sysfs GPIO interface (`/sys/class/gpio`).
//!
//! ```no_run
//! use gpio_file::{Direction, FilePin};
//!
//! # fn main() -> gpio_file::Result<()> {
//! let mut led = FilePin::open(4, Direction::Out, false)?;
//! led.write(true)?;
//! led.release()?;
//! # Ok(())
//! # }
//! ```
//!
//! Pins are not synchronised internally. Callers must make sure only one
//! owner drives a given pin id at a time, across threads and processes.

pub mod control;
pub mod error;
pub mod file_pin;
mod hal;
pub mod pin;
pub mod platform;

pub use control::{ControlSurface, SysfsControl};
pub use error::{Error, Operation, Result};
pub use file_pin::{FileBackend, FilePin};
pub use pin::{Backend, Direction, Pin};
pub use platform::{resolve_root, Config, Platform};
