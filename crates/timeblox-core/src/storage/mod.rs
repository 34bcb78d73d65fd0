//! Configuration and on-disk state.

mod config;
mod state_file;

pub use config::{Config, DisplayConfig, InteractionConfig, MasterSlotConfig};
pub use state_file::StateFile;

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the directory holding `config.toml` and `state.json`.
///
/// `TIMEBLOX_DATA_DIR` wins when set. Otherwise `~/.config/timeblox/`, or
/// `~/.config/timeblox-dev/` with `TIMEBLOX_ENV=dev`.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("TIMEBLOX_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("TIMEBLOX_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("timeblox-dev")
            } else {
                base_dir.join("timeblox")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
