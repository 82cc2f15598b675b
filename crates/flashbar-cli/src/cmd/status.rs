use crate::output::{on_off, print_json, print_table};
use anyhow::Context;
use flashbar_core::config::ReminderConfig;
use flashbar_core::settings::SettingsFile;
use std::path::Path;

pub fn run(settings_path: &Path, json: bool) -> anyhow::Result<()> {
    let store = SettingsFile::open(settings_path)
        .with_context(|| format!("failed to load {}", settings_path.display()))?;
    let cfg = ReminderConfig::from_store(&store);
    let warnings = store.values().validate();

    if json {
        return print_json(&serde_json::json!({
            "settings-file": settings_path,
            "config": cfg,
            "flash-span-ms": cfg.flash_span().as_millis() as u64,
            "warnings": warnings,
        }));
    }

    let rows = vec![
        vec!["reminder".to_string(), on_off(cfg.enabled).to_string()],
        vec!["interval".to_string(), format!("{}s", cfg.interval_secs)],
        vec!["target".to_string(), cfg.flash_mode.label().to_string()],
        vec![
            "flash".to_string(),
            format!(
                "{} x {} ms ({} ms total)",
                cfg.flash_count,
                cfg.flash_duration_ms,
                cfg.flash_span().as_millis()
            ),
        ],
        vec![
            "color".to_string(),
            format!("{} ({}% opacity)", cfg.flash_color, cfg.flash_color.opacity_percent()),
        ],
        vec!["indicator".to_string(), on_off(cfg.show_indicator).to_string()],
    ];
    print_table(&["SETTING", "VALUE"], rows);
    println!("\nSettings file: {}", settings_path.display());
    if !warnings.is_empty() {
        println!(
            "{} warning(s); run `flashbar config validate` for details.",
            warnings.len()
        );
    }
    Ok(())
}
