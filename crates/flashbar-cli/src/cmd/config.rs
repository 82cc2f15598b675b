use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use flashbar_core::color::Rgba;
use flashbar_core::config::WarnLevel;
use flashbar_core::settings::{
    SettingKey, SettingValue, Settings, SettingsFile, SettingsStore, ValueKind,
};
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show every setting with its current value
    Show,

    /// Print one setting
    Get {
        /// Setting key, e.g. flash-interval
        key: SettingKey,
    },

    /// Change one setting; integers outside their range are clamped
    Set {
        /// Setting key, e.g. flash-interval
        key: SettingKey,
        /// New value (booleans: true/false, flash-mode: top-bar/indicator)
        value: String,
    },

    /// Restore one setting, or all of them, to the default
    Reset {
        /// Setting key (omit to reset everything)
        key: Option<SettingKey>,
    },

    /// Change the flash color's opacity, keeping its hue
    Opacity {
        /// Opacity in percent
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        percent: u8,
    },

    /// Validate the settings file for out-of-range or malformed values
    Validate,

    /// Print the settings file location
    Path,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(settings_path: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(settings_path, json),
        ConfigSubcommand::Get { key } => get(settings_path, key, json),
        ConfigSubcommand::Set { key, value } => set(settings_path, key, &value, json),
        ConfigSubcommand::Reset { key } => reset(settings_path, key, json),
        ConfigSubcommand::Opacity { percent } => opacity(settings_path, percent, json),
        ConfigSubcommand::Validate => validate(settings_path, json),
        ConfigSubcommand::Path => path(settings_path, json),
    }
}

fn open(settings_path: &Path) -> anyhow::Result<SettingsFile> {
    SettingsFile::open(settings_path)
        .with_context(|| format!("failed to load {}", settings_path.display()))
}

fn print_value(key: SettingKey, value: &SettingValue, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&serde_json::json!({ "key": key, "value": value }));
    }
    println!("{value}");
    Ok(())
}

// ---------------------------------------------------------------------------
// show / get
// ---------------------------------------------------------------------------

fn show(settings_path: &Path, json: bool) -> anyhow::Result<()> {
    let store = open(settings_path)?;
    if json {
        return print_json(store.values());
    }

    let rows = SettingKey::all()
        .iter()
        .map(|key| {
            vec![
                key.to_string(),
                store.get(*key).to_string(),
                key.description().to_string(),
            ]
        })
        .collect();
    print_table(&["KEY", "VALUE", "DESCRIPTION"], rows);
    Ok(())
}

fn get(settings_path: &Path, key: SettingKey, json: bool) -> anyhow::Result<()> {
    let store = open(settings_path)?;
    print_value(key, &store.get(key), json)
}

// ---------------------------------------------------------------------------
// set / reset / opacity
// ---------------------------------------------------------------------------

fn set(settings_path: &Path, key: SettingKey, raw: &str, json: bool) -> anyhow::Result<()> {
    let mut store = open(settings_path)?;
    let requested = SettingValue::parse_for(key, raw)?;
    store
        .set(key, requested.clone())
        .with_context(|| format!("failed to set {key}"))?;

    let stored = store.get(key);
    if !json && key.kind() != ValueKind::Text && stored != requested {
        eprintln!("note: {key} clamped to {stored}");
    }
    print_value(key, &stored, json)
}

fn reset(settings_path: &Path, key: Option<SettingKey>, json: bool) -> anyhow::Result<()> {
    let mut store = open(settings_path)?;
    match key {
        Some(key) => {
            store.reset(key).context("failed to save settings")?;
            print_value(key, &store.get(key), json)
        }
        None => {
            store.reset_all().context("failed to save settings")?;
            if json {
                print_json(store.values())
            } else {
                println!("All settings restored to defaults.");
                Ok(())
            }
        }
    }
}

fn opacity(settings_path: &Path, percent: u8, json: bool) -> anyhow::Result<()> {
    let mut store = open(settings_path)?;
    let current = store
        .get(SettingKey::FlashColor)
        .as_text()
        .and_then(|s| Rgba::parse(s).ok())
        .unwrap_or_default();
    let updated = current.with_opacity(percent);
    store
        .set(SettingKey::FlashColor, SettingValue::Text(updated.to_css()))
        .context("failed to save settings")?;
    print_value(SettingKey::FlashColor, &store.get(SettingKey::FlashColor), json)
}

// ---------------------------------------------------------------------------
// validate / path
// ---------------------------------------------------------------------------

fn validate(settings_path: &Path, json: bool) -> anyhow::Result<()> {
    let settings = Settings::load(settings_path)
        .with_context(|| format!("failed to load {}", settings_path.display()))?;
    let warnings = settings.validate();

    if json {
        let value = serde_json::json!({
            "warnings": warnings,
        });
        print_json(&value)?;
    } else if warnings.is_empty() {
        println!("Settings are valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    let has_errors = warnings.iter().any(|w| w.level == WarnLevel::Error);
    if has_errors {
        anyhow::bail!("settings validation found errors");
    }

    Ok(())
}

fn path(settings_path: &Path, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&serde_json::json!({
            "path": settings_path,
            "exists": settings_path.exists(),
        }));
    }
    println!("{}", settings_path.display());
    Ok(())
}
