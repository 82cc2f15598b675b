use super::surface::TerminalSurface;
use super::timers::TokioTimers;
use anyhow::Context;
use flashbar_core::coordinator::{Event, FlashCoordinator, Handled, RunState};
use flashbar_core::settings::SettingsFile;
use flashbar_core::timer::TimerFired;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

pub type LiveCoordinator = FlashCoordinator<TokioTimers, TerminalSurface, SettingsFile>;

/// How often the settings file's mtime is checked.
const SETTINGS_POLL: Duration = Duration::from_millis(800);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Until {
    /// Run until Ctrl-C.
    Interrupted,
    /// Stop once no flash is running (or on Ctrl-C).
    FlashDone,
}

/// Feed timer fires and settings-file changes into the coordinator until
/// `until` is reached. The caller owns teardown.
pub async fn drive(
    coordinator: &mut LiveCoordinator,
    fires: &mut UnboundedReceiver<TimerFired>,
    until: Until,
) -> anyhow::Result<()> {
    let mut poll = tokio::time::interval(SETTINGS_POLL);
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            Some(fired) = fires.recv() => {
                match coordinator.handle(Event::Timer(fired)) {
                    Handled::Ignored => debug!(slot = %fired.slot, id = %fired.id, "dropped stale fire"),
                    handled => debug!(?handled, "timer handled"),
                }
            }
            _ = poll.tick() => {
                match coordinator.settings_mut().reload_if_modified() {
                    Ok(true) => {
                        let applied = coordinator.pump_settings();
                        info!(changes = applied, "settings file changed");
                    }
                    Ok(false) => {}
                    Err(e) => warn!(error = %e, "failed to reload settings"),
                }
            }
            signal = &mut ctrl_c => {
                signal.context("failed to listen for ctrl-c")?;
                info!("interrupted");
                break;
            }
        }

        coordinator
            .surface_mut()
            .flush()
            .context("failed to write to the terminal")?;

        if until == Until::FlashDone && coordinator.run_state() == RunState::Idle {
            break;
        }
    }
    Ok(())
}
