mod config;

pub use config::{EngineConfig, StreakSettings};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/ritualist[-dev]/` based on RITUALIST_ENV.
///
/// Set RITUALIST_ENV=dev to use a development config directory. The
/// directory is not created here; [`EngineConfig::save_to`] creates it on
/// first write.
///
/// # Errors
/// Returns an error if the home directory cannot be determined.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .ok_or_else(|| ConfigError::DirectoryUnavailable("home directory not found".into()))?
        .join(".config");

    let env = std::env::var("RITUALIST_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("ritualist-dev")
    } else {
        base_dir.join("ritualist")
    };

    Ok(dir)
}
