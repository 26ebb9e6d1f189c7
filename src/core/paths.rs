//! Centralized path helpers for the config and cache directories.

use std::path::PathBuf;

use crate::core::app;

/// Overrides the config directory (used by the integration tests and portable setups).
pub const CONFIG_DIR_VAR: &str = "ENHANCER_CONFIG_DIR";

/// Project directories (config, cache) from the standard platform locations.
pub fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("io", app::VENDOR, app::NAME)
}

/// Config directory (~/.config/equation-enhancer/), or `ENHANCER_CONFIG_DIR` when set.
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_VAR)
        && !dir.is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    project_dirs().map(|d| d.config_dir().to_path_buf())
}

/// Cache directory (~/.cache/equation-enhancer/). Holds the TUI log file.
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|d| d.cache_dir().to_path_buf())
}
