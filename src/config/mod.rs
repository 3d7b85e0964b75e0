//! Configuration management.

mod settings;
mod xdg;

pub use settings::{ConfigError, Messages, Settings, Timing};
pub use xdg::XdgDirs;
