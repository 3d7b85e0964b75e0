//! Config file location.
//!
//! `$XDG_CONFIG_HOME/storefront`, else `~/.config/storefront`, on every
//! platform.

use std::ffi::OsString;
use std::path::PathBuf;

const APP_DIR: &str = "storefront";

/// Directories the storefront client reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XdgDirs {
    pub config: PathBuf,
}

impl XdgDirs {
    pub fn new() -> Self {
        Self::resolve(std::env::var_os("XDG_CONFIG_HOME"), dirs::home_dir())
    }

    fn resolve(config_home: Option<OsString>, home: Option<PathBuf>) -> Self {
        // An empty XDG variable counts as unset.
        let base = config_home
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| home.unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        Self {
            config: base.join(APP_DIR),
        }
    }

    pub fn settings_file(&self) -> PathBuf {
        self.config.join("settings.json")
    }
}

impl Default for XdgDirs {
    fn default() -> Self {
        Self::new()
    }
}
