//! Client settings loaded from a JSON file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use super::XdgDirs;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// UI timing constants, all in milliseconds.
///
/// None of these carry a contract beyond "long enough for the animation";
/// they are tunable per deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    /// How long a toast stays visible.
    pub toast_display_ms: u64,
    /// Delay between hiding a toast and dropping it from the queue.
    pub toast_grace_ms: u64,
    /// Delay between closing the quick-view modal and clearing its product id.
    pub modal_close_delay_ms: u64,
    /// Minimum time the catalog loading overlay stays up.
    pub overlay_delay_ms: u64,
}

impl Timing {
    pub fn toast_display(&self) -> Duration {
        Duration::from_millis(self.toast_display_ms)
    }

    pub fn toast_grace(&self) -> Duration {
        Duration::from_millis(self.toast_grace_ms)
    }

    pub fn modal_close_delay(&self) -> Duration {
        Duration::from_millis(self.modal_close_delay_ms)
    }

    pub fn overlay_delay(&self) -> Duration {
        Duration::from_millis(self.overlay_delay_ms)
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            toast_display_ms: 5000,
            toast_grace_ms: 300,
            modal_close_delay_ms: 300,
            overlay_delay_ms: 300,
        }
    }
}

/// Fallback toast texts used when the server supplies none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub network_error: String,
    pub generic_error: String,
    pub product_load_error: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            network_error: "Network error".to_string(),
            generic_error: "Something went wrong".to_string(),
            product_load_error: "Could not load the product".to_string(),
        }
    }
}

/// Settings for one storefront page session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Origin every relative endpoint is resolved against.
    pub base_url: String,
    pub request_timeout_secs: u64,
    /// Element id of the catalog fragment swapped on filter/pagination.
    pub content_container_id: String,
    /// `<meta name=...>` holding the CSRF token.
    pub csrf_meta_name: String,
    /// Full-page search results path.
    pub search_path: String,
    /// Queries shorter than this never hit the suggestion endpoint.
    pub min_query_len: usize,
    pub timing: Timing,
    pub messages: Messages,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/".to_string(),
            request_timeout_secs: 15,
            content_container_id: "shop-content-wrapper".to_string(),
            csrf_meta_name: "csrf-token".to_string(),
            search_path: "/shop/".to_string(),
            min_query_len: 2,
            timing: Timing::default(),
            messages: Messages::default(),
        }
    }
}

impl Settings {
    /// Default path: `$XDG_CONFIG_HOME/storefront/settings.json`.
    pub fn default_config_path() -> PathBuf {
        XdgDirs::new().settings_file()
    }

    /// Load settings from the default path.
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load_from_path(&Self::default_config_path())
    }

    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Write settings as pretty JSON, creating parent directories.
    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.content_container_id, "shop-content-wrapper");
        assert_eq!(settings.min_query_len, 2);
        assert_eq!(settings.timing.toast_display(), Duration::from_millis(5000));
        assert_eq!(settings.timing.toast_grace(), Duration::from_millis(300));
        assert_eq!(settings.timing.modal_close_delay(), Duration::from_millis(300));
        assert_eq!(settings.timing.overlay_delay(), Duration::from_millis(300));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load_from_path(&dir.path().join("nope.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{"base_url": "https://shop.example/", "timing": {"toast_display_ms": 2000}}"#,
        )
        .unwrap();

        let settings = Settings::load_from_path(&path).unwrap();
        assert_eq!(settings.base_url, "https://shop.example/");
        assert_eq!(settings.timing.toast_display_ms, 2000);
        assert_eq!(settings.timing.toast_grace_ms, 300);
        assert_eq!(settings.search_path, "/shop/");
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            Settings::load_from_path(&path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let mut settings = Settings::default();
        settings.messages.network_error = "Offline".to_string();

        settings.save_to_path(&path).unwrap();
        assert_eq!(Settings::load_from_path(&path).unwrap(), settings);
    }
}
