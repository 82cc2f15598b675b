use crate::runtime::timers::TokioTimers;
use crate::runtime::{self, event_loop, surface};
use anyhow::Context;
use flashbar_core::coordinator::FlashCoordinator;
use flashbar_core::settings::SettingsFile;
use std::path::Path;
use tokio::sync::mpsc;
use tracing::{debug, info};

pub fn run(settings_path: &Path, plain: bool) -> anyhow::Result<()> {
    let settings = SettingsFile::open(settings_path)
        .with_context(|| format!("failed to load {}", settings_path.display()))?;
    info!(path = %settings_path.display(), "watching settings");

    let style = if plain {
        surface::Style::Plain
    } else {
        surface::Style::Bar
    };

    runtime::block_on(async move {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut coordinator = FlashCoordinator::new(
            TokioTimers::new(tx),
            surface::TerminalSurface::new(style),
            settings,
        );
        coordinator.enable();
        coordinator
            .surface_mut()
            .flush()
            .context("failed to write to the terminal")?;

        let result = event_loop::drive(&mut coordinator, &mut rx, event_loop::Until::Interrupted).await;
        coordinator.teardown();
        debug!(live_timers = coordinator.timers().live_count(), "torn down");
        coordinator
            .surface_mut()
            .finish()
            .context("failed to write to the terminal")?;
        result?;
        anyhow::Ok(())
    })?
}
