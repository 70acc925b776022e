//! Where querscripts live.

use std::env;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the script directory.
pub const SCRIPT_DIR_ENV: &str = "QUER_SCRIPT_DIR";

/// Default directory name under the home directory.
const DEFAULT_SCRIPT_DIR: &str = ".querscripts";

/// Default querscript file extension.
const DEFAULT_EXTENSION: &str = "querscript";

/// Script storage settings.
///
/// ## Examples
///
/// ```
/// use quer_lib::QuerConfig;
///
/// let config = QuerConfig::new("/tmp/scripts".into());
/// assert_eq!(config.extension(), "querscript");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerConfig {
    script_dir: PathBuf,
    extension: String,
}

impl QuerConfig {
    /// Creates a configuration rooted at `script_dir`.
    #[must_use]
    pub fn new(script_dir: PathBuf) -> Self {
        Self {
            script_dir,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Builds the configuration from the environment.
    ///
    /// Uses `$QUER_SCRIPT_DIR` when it is set and non-empty, otherwise
    /// `~/.querscripts`. Falls back to `./.querscripts` when no home
    /// directory can be determined.
    #[must_use]
    pub fn from_env() -> Self {
        let script_dir = env::var_os(SCRIPT_DIR_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_script_dir);

        Self::new(script_dir)
    }

    /// Returns the script directory.
    #[must_use]
    pub fn script_dir(&self) -> &Path {
        &self.script_dir
    }

    /// Returns the script file extension.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }
}

impl Default for QuerConfig {
    fn default() -> Self {
        Self::new(default_script_dir())
    }
}

fn default_script_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_SCRIPT_DIR)
}
