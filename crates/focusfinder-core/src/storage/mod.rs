mod config;

pub use config::Config;

use std::path::PathBuf;

use crate::error::ConfigError;

/// Environment variable that overrides the configuration directory.
pub const CONFIG_DIR_ENV: &str = "FOCUSFINDER_CONFIG_DIR";

/// Returns `$FOCUSFINDER_CONFIG_DIR` if set, otherwise `~/.config/focusfinder/`.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os(CONFIG_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("focusfinder"),
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DirectoryUnavailable(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
