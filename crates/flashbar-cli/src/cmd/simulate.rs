use crate::output::{describe, format_secs, print_json};
use anyhow::Context;
use flashbar_core::coordinator::{Event, FlashCoordinator};
use flashbar_core::settings::{SettingKey, SettingValue, Settings, SettingsFile};
use flashbar_core::timer::ManualTimers;
use flashbar_core::visual::RecordingSurface;
use serde::Serialize;
use std::path::Path;
use std::str::FromStr;

type Simulation = FlashCoordinator<ManualTimers, RecordingSurface, SettingsFile>;

// ---------------------------------------------------------------------------
// Scripted changes
// ---------------------------------------------------------------------------

/// `--interval-at AT:SECS`: set flash-interval to SECS at second AT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalChange {
    pub at_secs: u64,
    pub interval_secs: i64,
}

impl FromStr for IntervalChange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (at, secs) = s
            .split_once(':')
            .ok_or_else(|| format!("expected AT:SECS, got '{s}'"))?;
        let at_secs = at
            .trim()
            .parse()
            .map_err(|_| format!("invalid time '{at}'"))?;
        let interval_secs = secs
            .trim()
            .parse()
            .map_err(|_| format!("invalid interval '{secs}'"))?;
        Ok(Self {
            at_secs,
            interval_secs,
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Disable,
    Interval(i64),
}

#[derive(Debug, Serialize)]
struct TimelineEntry {
    at_ms: u64,
    change: String,
}

#[derive(Debug, Serialize)]
struct Report {
    seconds: u64,
    triggers: u64,
    timeline: Vec<TimelineEntry>,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Replay the reminder in virtual time with the stored flash settings. The
/// reminder is switched on at t=0 whatever `timer-enabled` says.
pub fn run(
    settings_path: &Path,
    seconds: u64,
    disable_at: Option<u64>,
    interval_at: Vec<IntervalChange>,
    json: bool,
) -> anyhow::Result<()> {
    let mut values = Settings::load(settings_path)
        .with_context(|| format!("failed to load {}", settings_path.display()))?;
    values.timer_enabled = true;

    let actions = schedule(disable_at, &interval_at);
    let report = simulate(values, seconds, &actions)?;

    if json {
        return print_json(&report);
    }
    for entry in &report.timeline {
        println!("{:>10}  {}", format_secs(entry.at_ms), entry.change);
    }
    println!("{} trigger(s) in {}s", report.triggers, report.seconds);
    Ok(())
}

/// Scripted changes in firing order, keyed by millisecond.
fn schedule(disable_at: Option<u64>, interval_at: &[IntervalChange]) -> Vec<(u64, Action)> {
    let mut actions: Vec<(u64, Action)> = interval_at
        .iter()
        .map(|c| (c.at_secs.saturating_mul(1000), Action::Interval(c.interval_secs)))
        .collect();
    if let Some(at) = disable_at {
        actions.push((at.saturating_mul(1000), Action::Disable));
    }
    actions.sort_by_key(|(at, _)| *at);
    actions
}

fn simulate(values: Settings, seconds: u64, actions: &[(u64, Action)]) -> anyhow::Result<Report> {
    let mut sim: Simulation = FlashCoordinator::new(
        ManualTimers::new(),
        RecordingSurface::new(),
        SettingsFile::in_memory(values),
    );
    sim.enable();
    sim.surface_mut().take_log();

    let end_ms = seconds.saturating_mul(1000);
    let mut timeline = Vec::new();

    for (at_ms, action) in actions.iter().filter(|(at, _)| *at <= end_ms) {
        advance(&mut sim, *at_ms, &mut timeline);
        match action {
            Action::Disable => {
                sim.update_setting(SettingKey::TimerEnabled, SettingValue::Bool(false))?
            }
            Action::Interval(secs) => {
                sim.update_setting(SettingKey::FlashInterval, SettingValue::Int(*secs))?
            }
        }
        record(&mut sim, *at_ms, &mut timeline);
    }
    advance(&mut sim, end_ms, &mut timeline);
    sim.teardown();

    Ok(Report {
        seconds,
        triggers: sim.trigger_count(),
        timeline,
    })
}

/// Deliver every fire due up to `until_ms`, logging the visual changes each
/// one causes at the moment it fired.
fn advance(sim: &mut Simulation, until_ms: u64, timeline: &mut Vec<TimelineEntry>) {
    while let Some(fired) = sim.timers_mut().pop_due(until_ms) {
        sim.handle(Event::Timer(fired));
        let now = sim.timers().now_ms();
        record(sim, now, timeline);
    }
}

fn record(sim: &mut Simulation, at_ms: u64, timeline: &mut Vec<TimelineEntry>) {
    timeline.extend(sim.surface_mut().take_log().iter().map(|change| TimelineEntry {
        at_ms,
        change: describe(change),
    }));
}
