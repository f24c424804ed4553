//! Configuration and cache directory paths
//!
//! Uses XDG directories via `dirs` crate.
//!
//! Platform-specific locations:
//! - Linux: `~/.config/scriptlog/`, `~/.cache/scriptlog/`
//! - macOS: `~/Library/Application Support/scriptlog/`, `~/Library/Caches/scriptlog/`
//! - Windows: `%APPDATA%\scriptlog\`, `%LOCALAPPDATA%\scriptlog\`

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_NAME: &str = "scriptlog";
const GLOBAL_CONFIG_FILE: &str = "config.toml";

/// Get the application config directory, without creating it
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join(APP_NAME))
}

/// Get the application cache directory, creating it if needed
/// Returns ~/.cache/scriptlog/ on Linux, ~/Library/Caches/scriptlog/ on macOS
pub fn cache_dir() -> Result<PathBuf> {
    let base = dirs::cache_dir().context("Could not determine cache directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create cache directory {:?}", dir))?;
    Ok(dir)
}

/// Get path to the global config file
pub fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(GLOBAL_CONFIG_FILE))
}
