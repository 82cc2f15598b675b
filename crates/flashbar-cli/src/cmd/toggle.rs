use crate::output::print_json;
use anyhow::Context;
use flashbar_core::config::ReminderConfig;
use flashbar_core::settings::{SettingKey, SettingValue, SettingsFile, SettingsStore};
use std::path::Path;

/// Write `timer-enabled`. A running `flashbar run` picks the change up from
/// the file.
pub fn set_enabled(settings_path: &Path, enabled: bool, json: bool) -> anyhow::Result<()> {
    let mut store = open(settings_path)?;
    write(&mut store, enabled)?;
    report(&store, json)
}

pub fn toggle(settings_path: &Path, json: bool) -> anyhow::Result<()> {
    let mut store = open(settings_path)?;
    let enabled = !store.get_bool(SettingKey::TimerEnabled);
    write(&mut store, enabled)?;
    report(&store, json)
}

fn open(settings_path: &Path) -> anyhow::Result<SettingsFile> {
    SettingsFile::open(settings_path)
        .with_context(|| format!("failed to load {}", settings_path.display()))
}

fn write(store: &mut SettingsFile, enabled: bool) -> anyhow::Result<()> {
    store
        .set(SettingKey::TimerEnabled, SettingValue::Bool(enabled))
        .context("failed to save settings")
}

fn report(store: &SettingsFile, json: bool) -> anyhow::Result<()> {
    let cfg = ReminderConfig::from_store(store);
    if json {
        return print_json(&serde_json::json!({
            "timer-enabled": cfg.enabled,
            "flash-interval": cfg.interval_secs,
        }));
    }
    if cfg.enabled {
        println!("Reminder enabled: flashing every {}s.", cfg.interval_secs);
    } else {
        println!("Reminder disabled.");
    }
    Ok(())
}
