use crate::output::print_json;
use crate::runtime::timers::TokioTimers;
use crate::runtime::{self, event_loop, surface};
use anyhow::Context;
use flashbar_core::coordinator::FlashCoordinator;
use flashbar_core::settings::{SettingKey, SettingValue, Settings, SettingsFile};
use flashbar_core::types::FlashMode;
use flashbar_core::visual::Surface;
use std::path::Path;
use std::time::Instant;
use tokio::sync::mpsc;

pub struct FlashArgs {
    pub mode: Option<FlashMode>,
    pub duration: Option<u32>,
    pub count: Option<u32>,
    pub plain: bool,
}

/// Preview one flash with real timers. The periodic reminder is not started
/// and the settings file is left untouched.
pub fn run(settings_path: &Path, args: FlashArgs, json: bool) -> anyhow::Result<()> {
    let mut values = Settings::load(settings_path)
        .with_context(|| format!("failed to load {}", settings_path.display()))?;
    if let Some(duration) = args.duration {
        values.set(SettingKey::FlashDuration, SettingValue::Int(duration.into()))?;
    }
    if let Some(count) = args.count {
        values.set(SettingKey::FlashCount, SettingValue::Int(count.into()))?;
    }

    let style = if json {
        surface::Style::Quiet
    } else if args.plain {
        surface::Style::Plain
    } else {
        surface::Style::Bar
    };

    let (target, cfg, elapsed) = runtime::block_on(async move {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut coordinator = FlashCoordinator::new(
            TokioTimers::new(tx),
            surface::TerminalSurface::new(style),
            SettingsFile::in_memory(values),
        );
        let cfg = coordinator.config();
        coordinator.surface_mut().set_flash_color(cfg.flash_color);
        coordinator.surface_mut().set_indicator_visible(true);

        let started = Instant::now();
        let target = coordinator.flash_now(args.mode);
        coordinator
            .surface_mut()
            .flush()
            .context("failed to write to the terminal")?;

        let result = event_loop::drive(&mut coordinator, &mut rx, event_loop::Until::FlashDone).await;
        let elapsed = started.elapsed();
        coordinator.teardown();
        coordinator
            .surface_mut()
            .finish()
            .context("failed to write to the terminal")?;
        result?;
        anyhow::Ok((target, cfg, elapsed))
    })??;

    if json {
        print_json(&serde_json::json!({
            "target": target,
            "duration-ms": cfg.flash_duration_ms,
            "count": cfg.flash_count,
            "elapsed-ms": elapsed.as_millis() as u64,
        }))?;
    }
    Ok(())
}
