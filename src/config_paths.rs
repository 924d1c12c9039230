//! Where imagetile keeps its files
//!
//! ```text
//! <config dir>/imagetile/
//!     config.yaml
//!     logs/imagetile.log.YYYY-MM-DD
//! ```
//!
//! `<config dir>` is `$XDG_CONFIG_HOME` or `~/.config` on Unix and macOS, and
//! `%APPDATA%` on Windows. Setting `IMAGETILE_HOME` replaces the whole
//! `<config dir>/imagetile` path.

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "imagetile";

/// Overrides the application directory when set
pub const HOME_ENV: &str = "IMAGETILE_HOME";

/// Prefix of the daily-rotated log files
pub const LOG_FILE_PREFIX: &str = "imagetile.log";

const CONFIG_FILE: &str = "config.yaml";
const LOGS_DIR: &str = "logs";

fn platform_config_root() -> Option<PathBuf> {
    if cfg!(target_os = "windows") {
        return env::var_os("APPDATA").map(PathBuf::from);
    }
    env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
}

/// The application directory, or `None` when no home can be determined
pub fn config_dir() -> Option<PathBuf> {
    if let Some(home) = env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(home));
    }
    platform_config_root().map(|root| root.join(APP_DIR))
}

pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE))
}

pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(LOGS_DIR))
}

/// Create the logs directory (and its parents) and return it
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    let logs = logs_dir().ok_or_else(|| "No config directory available".to_string())?;
    std::fs::create_dir_all(&logs)
        .map_err(|e| format!("Failed to create {}: {}", logs.display(), e))?;
    Ok(logs)
}
