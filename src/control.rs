use log::debug;
use std::{
    fs, io,
    path::{Path, PathBuf},
    thread,
    time::{Duration, Instant},
};

use crate::pin::Direction;
use crate::platform::Config;

const NODE_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// The OS-level mechanism exposing per-pin control nodes.
///
/// Implementations deal in the raw text of the control files; encoding and
/// decoding of logic levels is left to the caller. Pins are identified only
/// by their number, so one surface may be shared by many pins.
pub trait ControlSurface {
    /// Registers pin `id` with the control surface.
    fn export_pin(&self, id: u32) -> io::Result<()>;

    /// Deregisters pin `id`.
    fn unexport_pin(&self, id: u32) -> io::Result<()>;

    /// Whether the control node for pin `id` exists.
    fn pin_is_exported(&self, id: u32) -> io::Result<bool>;

    /// Blocks until the control node of a just-exported pin is usable.
    fn wait_for_node(&self, id: u32) -> io::Result<()>;

    fn set_direction(&self, id: u32, direction: Direction) -> io::Result<()>;

    fn write_value(&self, id: u32, value: &str) -> io::Result<()>;

    /// Returns the raw contents of the value node.
    fn read_value(&self, id: u32) -> io::Result<String>;
}

/// Control surface speaking the sysfs GPIO file protocol under `root`.
///
/// | Operation | Target | Content |
/// |---|---|---|
/// | export | `root/export` | pin number |
/// | unexport | `root/unexport` | pin number |
/// | direction | `root/gpioN/direction` | `in` or `out` |
/// | value | `root/gpioN/value` | `1` or `0` |
#[derive(Clone, Debug)]
pub struct SysfsControl {
    root: PathBuf,
    export_timeout: Duration,
}

impl SysfsControl {
    /// Creates a control surface rooted at `root`.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        SysfsControl {
            root: root.as_ref().to_path_buf(),
            export_timeout: Config::default().export_timeout(),
        }
    }

    /// Creates a control surface at the root selected by `config`.
    ///
    /// The root is resolved here and kept for the lifetime of the surface.
    pub fn from_config(config: &Config) -> Self {
        SysfsControl {
            root: config.root(),
            export_timeout: config.export_timeout(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn node_dir(&self, id: u32) -> PathBuf {
        self.root.join(format!("gpio{}", id))
    }

    fn write_file(&self, path: &Path, contents: &str) -> io::Result<()> {
        debug!("writing {:?} to {}", contents, path.display());
        fs::write(path, contents)
    }
}

impl ControlSurface for SysfsControl {
    fn export_pin(&self, id: u32) -> io::Result<()> {
        self.write_file(&self.root.join("export"), &id.to_string())
    }

    fn unexport_pin(&self, id: u32) -> io::Result<()> {
        self.write_file(&self.root.join("unexport"), &id.to_string())
    }

    fn pin_is_exported(&self, id: u32) -> io::Result<bool> {
        Ok(self.node_dir(id).is_dir())
    }

    fn wait_for_node(&self, id: u32) -> io::Result<()> {
        let node = self.node_dir(id);
        // the value file shows up last, once udev has fixed permissions
        let value = node.join("value");
        let start = Instant::now();
        while !value.exists() {
            if start.elapsed() >= self.export_timeout {
                // nothing populates a scratch root, so create the node ourselves
                debug!("creating {}", node.display());
                return fs::create_dir_all(&node);
            }
            thread::sleep(NODE_POLL_INTERVAL);
        }
        Ok(())
    }

    fn set_direction(&self, id: u32, direction: Direction) -> io::Result<()> {
        self.write_file(&self.node_dir(id).join("direction"), direction.as_str())
    }

    fn write_value(&self, id: u32, value: &str) -> io::Result<()> {
        self.write_file(&self.node_dir(id).join("value"), value)
    }

    fn read_value(&self, id: u32) -> io::Result<String> {
        let path = self.node_dir(id).join("value");
        let value = fs::read_to_string(&path)?;
        debug!("read {:?} from {}", value, path.display());
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch() -> (tempfile::TempDir, SysfsControl) {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default()
            .with_root(dir.path())
            .with_export_timeout(Duration::ZERO);
        let control = SysfsControl::from_config(&config);
        (dir, control)
    }

    #[test]
    fn export_writes_decimal_id() {
        let (dir, control) = scratch();
        control.export_pin(27).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("export")).unwrap(), "27");
        control.unexport_pin(27).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("unexport")).unwrap(), "27");
    }

    #[test]
    fn wait_for_node_creates_missing_node() {
        let (dir, control) = scratch();
        assert!(!control.pin_is_exported(5).unwrap());
        control.wait_for_node(5).unwrap();
        assert!(dir.path().join("gpio5").is_dir());
        assert!(control.pin_is_exported(5).unwrap());
    }

    #[test]
    fn wait_for_node_returns_once_value_exists() {
        let (dir, control) = scratch();
        let node = dir.path().join("gpio7");
        fs::create_dir(&node).unwrap();
        fs::write(node.join("value"), "0").unwrap();
        control.wait_for_node(7).unwrap();
        assert_eq!(fs::read_to_string(node.join("value")).unwrap(), "0");
    }

    #[test]
    fn wait_for_node_accepts_existing_dir_without_value() {
        let (dir, control) = scratch();
        fs::create_dir(dir.path().join("gpio8")).unwrap();
        control.wait_for_node(8).unwrap();
        assert!(control.pin_is_exported(8).unwrap());
    }

    #[test]
    fn direction_and_value_files() {
        let (dir, control) = scratch();
        control.wait_for_node(6).unwrap();
        control.set_direction(6, Direction::Out).unwrap();
        control.write_value(6, "1").unwrap();
        let node = dir.path().join("gpio6");
        assert_eq!(fs::read_to_string(node.join("direction")).unwrap(), "out");
        assert_eq!(control.read_value(6).unwrap(), "1");
    }

    #[test]
    fn read_missing_node_fails() {
        let (_dir, control) = scratch();
        let err = control.read_value(9).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
