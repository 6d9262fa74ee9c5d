use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Directory name under the platform data directory
pub const APP_DIR_NAME: &str = "i-board";

/// Overrides the data directory, mainly for tests and portable installs
pub const APP_DIR_ENV: &str = "CLIP_HISTORY_DIR";

const HISTORY_FILENAME: &str = "history.json";
const CONFIG_FILENAME: &str = "config.json";

/// Get the application data directory
///
/// `$CLIP_HISTORY_DIR` if set, otherwise the platform data directory:
/// - macOS: `~/Library/Application Support/i-board/`
/// - Linux: `~/.local/share/i-board/`
/// - Windows: `%APPDATA%\i-board\`
pub fn get_app_dir() -> Result<PathBuf> {
    if let Some(dir) = env::var_os(APP_DIR_ENV).filter(|dir| !dir.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let data_dir = dirs::data_dir().context("Failed to get platform data directory")?;
    Ok(data_dir.join(APP_DIR_NAME))
}

/// Get path to the persisted history
pub fn get_history_path() -> Result<PathBuf> {
    Ok(get_app_dir()?.join(HISTORY_FILENAME))
}

/// Get path to the settings file
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_app_dir()?.join(CONFIG_FILENAME))
}
