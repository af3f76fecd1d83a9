use std::{
    env,
    path::{Path, PathBuf},
    time::Duration,
};

/// Control root of the kernel GPIO sysfs interface.
pub const SYSFS_ROOT: &str = "/sys/class/gpio";

/// Scratch root used in test mode and on macOS.
pub const UNIX_TEST_ROOT: &str = "/tmp/RasPiGpioTest";

/// Scratch root used on Windows hosts.
pub const WINDOWS_TEST_ROOT: &str = r"C:\RasPiGpioTest";

/// Environment variable enabling test mode (`1`, `true` or `yes`).
pub const TEST_MODE_ENV: &str = "GPIO_FILE_TEST_MODE";

/// Environment variable overriding the control-surface root.
pub const ROOT_ENV: &str = "GPIO_FILE_ROOT";

const DEFAULT_EXPORT_TIMEOUT: Duration = Duration::from_secs(1);

/// Host operating system family, as far as root selection cares.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
    Other,
}

impl Platform {
    /// The platform this crate was compiled for.
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else {
            Platform::Other
        }
    }
}

/// Selects the control-surface root for a platform.
///
/// Windows always gets a Windows style scratch path. Test mode and macOS get
/// the Unix scratch path. Everything else talks to the real sysfs interface.
pub fn resolve_root(platform: Platform, test_mode: bool) -> PathBuf {
    match platform {
        Platform::Windows => PathBuf::from(WINDOWS_TEST_ROOT),
        Platform::MacOs => PathBuf::from(UNIX_TEST_ROOT),
        _ if test_mode => PathBuf::from(UNIX_TEST_ROOT),
        _ => PathBuf::from(SYSFS_ROOT),
    }
}

/// Settings for the file-backed control surface.
///
/// # Example
///
/// ```rust
/// use gpio_file::Config;
///
/// let config = Config::default().test_mode(true);
/// assert!(config.root().starts_with("/tmp") || cfg!(windows));
/// ```
#[derive(Clone, Debug)]
pub struct Config {
    test_mode: bool,
    root_override: Option<PathBuf>,
    export_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            test_mode: false,
            root_override: None,
            export_timeout: DEFAULT_EXPORT_TIMEOUT,
        }
    }
}

impl Config {
    /// Builds a config from the defaults plus the `GPIO_FILE_TEST_MODE` and
    /// `GPIO_FILE_ROOT` environment variables.
    pub fn from_env() -> Self {
        Config::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        if let Some(flag) = lookup(TEST_MODE_ENV) {
            config.test_mode = parse_flag(&flag);
        }
        if let Some(root) = lookup(ROOT_ENV) {
            if !root.trim().is_empty() {
                config.root_override = Some(PathBuf::from(root.trim()));
            }
        }
        config
    }

    /// Use the scratch root instead of the real control surface.
    pub fn test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    /// Use `root` regardless of platform and test mode.
    pub fn with_root<P: AsRef<Path>>(mut self, root: P) -> Self {
        self.root_override = Some(root.as_ref().to_path_buf());
        self
    }

    /// How long to wait for a freshly exported pin's node to appear.
    pub fn with_export_timeout(mut self, timeout: Duration) -> Self {
        self.export_timeout = timeout;
        self
    }

    pub fn is_test_mode(&self) -> bool {
        self.test_mode
    }

    pub fn export_timeout(&self) -> Duration {
        self.export_timeout
    }

    /// The control-surface root this config selects on the current host.
    pub fn root(&self) -> PathBuf {
        match &self.root_override {
            Some(root) => root.clone(),
            None => resolve_root(Platform::current(), self.test_mode),
        }
    }
}

fn parse_flag(s: &str) -> bool {
    matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linux_production_root() {
        assert_eq!(
            resolve_root(Platform::Linux, false),
            PathBuf::from("/sys/class/gpio")
        );
        assert_eq!(
            resolve_root(Platform::Other, false),
            PathBuf::from("/sys/class/gpio")
        );
    }

    #[test]
    fn test_mode_uses_scratch_root() {
        assert_eq!(
            resolve_root(Platform::Linux, true),
            PathBuf::from(UNIX_TEST_ROOT)
        );
    }

    #[test]
    fn non_production_hosts_use_scratch_roots() {
        assert_eq!(
            resolve_root(Platform::MacOs, false),
            PathBuf::from(UNIX_TEST_ROOT)
        );
        assert_eq!(
            resolve_root(Platform::Windows, false),
            PathBuf::from(WINDOWS_TEST_ROOT)
        );
        assert_eq!(
            resolve_root(Platform::Windows, true),
            PathBuf::from(WINDOWS_TEST_ROOT)
        );
    }

    #[test]
    fn root_override_wins() {
        let config = Config::default().test_mode(true).with_root("/srv/gpio");
        assert_eq!(config.root(), PathBuf::from("/srv/gpio"));
    }

    #[test]
    fn flags() {
        assert!(parse_flag("1"));
        assert!(parse_flag(" TRUE\n"));
        assert!(parse_flag("yes"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
        assert!(!parse_flag("nope"));
        assert!(!parse_flag("on"));
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert!(!config.is_test_mode());
        assert_eq!(config.export_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn config_from_variables() {
        let vars = |key: &str| match key {
            TEST_MODE_ENV => Some("yes".to_string()),
            ROOT_ENV => Some(" /srv/gpio\n".to_string()),
            _ => None,
        };
        let config = Config::from_lookup(vars);
        assert!(config.is_test_mode());
        assert_eq!(config.root(), PathBuf::from("/srv/gpio"));
    }

    #[test]
    fn config_without_variables() {
        let config = Config::from_lookup(|_| None);
        assert!(!config.is_test_mode());
        assert_eq!(config.root(), resolve_root(Platform::current(), false));

        let blank_root = |key: &str| (key == ROOT_ENV).then(|| "  ".to_string());
        let config = Config::from_lookup(blank_root);
        assert_eq!(config.root(), resolve_root(Platform::current(), false));
    }
}
