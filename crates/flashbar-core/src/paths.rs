use crate::error::{FlashbarError, Result};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const APP_DIR: &str = "flashbar";
pub const SETTINGS_FILE: &str = "settings.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// `$XDG_CONFIG_HOME/flashbar/settings.yaml`, else `~/.config/flashbar/settings.yaml`.
pub fn default_settings_path() -> Result<PathBuf> {
    let xdg = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from);
    settings_path_from(xdg.as_deref(), home::home_dir().as_deref())
}

pub fn settings_path_from(xdg_config_home: Option<&Path>, home: Option<&Path>) -> Result<PathBuf> {
    // An empty or relative XDG_CONFIG_HOME is ignored.
    if let Some(xdg) = xdg_config_home.filter(|p| p.is_absolute()) {
        return Ok(xdg.join(APP_DIR).join(SETTINGS_FILE));
    }
    let home = home.ok_or(FlashbarError::HomeNotFound)?;
    Ok(home.join(".config").join(APP_DIR).join(SETTINGS_FILE))
}
