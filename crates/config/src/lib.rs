pub mod credentials;
pub mod schema;

pub use credentials::{load_credentials, ChatId, Credentials};
pub use schema::{DataConfig, PlotConfig, ShareConfig, TelegramConfig};

use share_core::{Result, ShareError};
use std::path::{Path, PathBuf};

/// Load an explicitly requested settings file, warning and falling back to
/// defaults if it does not exist.
pub fn load(path: impl AsRef<Path>) -> Result<ShareConfig> {
    let path = path.as_ref();
    Ok(read_settings(path)?.unwrap_or_else(|| {
        tracing::warn!("Settings file not found at '{}'; using defaults.", path.display());
        ShareConfig::default()
    }))
}

/// Load [`default_path`]. Most installs have no settings file, so its
/// absence is only logged at debug level.
pub fn load_default() -> Result<ShareConfig> {
    let path = default_path();
    Ok(read_settings(&path)?.unwrap_or_else(|| {
        tracing::debug!("No settings at '{}'; using defaults.", path.display());
        ShareConfig::default()
    }))
}

/// Parse `path`, or `None` if it does not exist.
fn read_settings(path: &Path) -> Result<Option<ShareConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| ShareError::Config(format!("cannot read '{}': {e}", path.display())))?;

    toml::from_str(&raw)
        .map(Some)
        .map_err(|e| ShareError::Config(format!("TOML parse error in '{}': {e}", path.display())))
}

/// Return the default settings path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("share").join("share.toml")
}
