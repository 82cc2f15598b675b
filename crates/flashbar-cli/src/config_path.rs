use anyhow::Context;
use flashbar_core::paths;
use std::path::{Path, PathBuf};

/// Resolve the settings file.
///
/// Priority:
/// 1. `--config` flag / `FLASHBAR_CONFIG` env var (passed in as `explicit`)
/// 2. `$XDG_CONFIG_HOME/flashbar/settings.yaml`
/// 3. `~/.config/flashbar/settings.yaml`
pub fn resolve_settings_path(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(p) = explicit {
        return Ok(p.to_path_buf());
    }
    paths::default_settings_path().context("cannot locate the settings file; pass --config")
}
