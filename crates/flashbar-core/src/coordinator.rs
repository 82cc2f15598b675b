//! Top-level controller: owns the reminder scheduler, one animator per target,
//! the surface, the timer host and the settings store, and turns timer fires
//! and settings changes into state transitions.
//!
//! Reminder state is `{disabled, enabled}` (enabled exactly while the reminder
//! timer is armed); run state is `{idle, flashing}`. At most one flash run
//! exists at a time across both targets.

use crate::animator::{FlashAnimator, StepOutcome};
use crate::config::ReminderConfig;
use crate::error::Result;
use crate::scheduler::ReminderScheduler;
use crate::settings::{SettingKey, SettingValue, SettingsStore, SubscriptionId};
use crate::timer::{ManualTimers, TimerFired, TimerHost, TimerSlot};
use crate::types::{FlashMode, FlashTarget};
use crate::visual::Surface;
use serde::Serialize;
use tracing::{debug, info};

// ---------------------------------------------------------------------------
// Events and states
// ---------------------------------------------------------------------------

/// Everything the coordinator reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Timer(TimerFired),
    SettingChanged(SettingKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderState {
    Disabled,
    Enabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "target")]
pub enum RunState {
    Idle,
    Flashing(FlashTarget),
}

/// What handling one event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// Stale timer fire, or a settings event while not started.
    Ignored,
    /// The reminder fired and a flash started on this target.
    Triggered(FlashTarget),
    /// A flash step ran on this target.
    Stepped(FlashTarget, StepOutcome),
    /// A settings change was applied.
    Reconfigured(SettingKey),
}

// ---------------------------------------------------------------------------
// FlashCoordinator
// ---------------------------------------------------------------------------

pub struct FlashCoordinator<T, V, S> {
    timers: T,
    surface: V,
    settings: S,
    scheduler: ReminderScheduler,
    top_bar: FlashAnimator,
    indicator: FlashAnimator,
    subscriptions: Vec<SubscriptionId>,
    triggers: u64,
}

impl<T, V, S> FlashCoordinator<T, V, S>
where
    T: TimerHost,
    V: Surface,
    S: SettingsStore,
{
    /// Starts `disabled, idle`; nothing is armed or subscribed until `enable`.
    pub fn new(timers: T, surface: V, settings: S) -> Self {
        Self {
            timers,
            surface,
            settings,
            scheduler: ReminderScheduler::new(),
            top_bar: FlashAnimator::new(FlashTarget::TopBar),
            indicator: FlashAnimator::new(FlashTarget::Indicator),
            subscriptions: Vec::new(),
            triggers: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn timers(&self) -> &T {
        &self.timers
    }

    pub fn timers_mut(&mut self) -> &mut T {
        &mut self.timers
    }

    pub fn surface(&self) -> &V {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut V {
        &mut self.surface
    }

    pub fn settings(&self) -> &S {
        &self.settings
    }

    /// Writes made through this reference are seen on the next `pump_settings`.
    pub fn settings_mut(&mut self) -> &mut S {
        &mut self.settings
    }

    pub fn scheduler(&self) -> &ReminderScheduler {
        &self.scheduler
    }

    pub fn animator(&self, target: FlashTarget) -> &FlashAnimator {
        match target {
            FlashTarget::TopBar => &self.top_bar,
            FlashTarget::Indicator => &self.indicator,
        }
    }

    pub fn config(&self) -> ReminderConfig {
        ReminderConfig::from_store(&self.settings)
    }

    /// Number of reminder triggers handled since creation.
    pub fn trigger_count(&self) -> u64 {
        self.triggers
    }

    pub fn is_started(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    pub fn reminder_state(&self) -> ReminderState {
        if self.scheduler.is_running() {
            ReminderState::Enabled
        } else {
            ReminderState::Disabled
        }
    }

    pub fn run_state(&self) -> RunState {
        [&self.top_bar, &self.indicator]
            .into_iter()
            .find(|a| a.is_active())
            .map_or(RunState::Idle, |a| RunState::Flashing(a.target()))
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Subscribe to settings, push the initial indicator state to the surface
    /// and start the reminder if it is enabled. Does nothing when already
    /// started.
    pub fn enable(&mut self) {
        if self.is_started() {
            return;
        }
        for key in SettingKey::all() {
            let id = self.settings.subscribe(*key);
            self.subscriptions.push(id);
        }

        let cfg = self.config();
        self.surface.set_indicator_visible(cfg.show_indicator);
        self.surface.set_flash_color(cfg.flash_color);
        self.surface.set_reminder_active(cfg.enabled);
        if cfg.enabled {
            self.scheduler.start(&mut self.timers, cfg.interval_secs);
        }
        info!(
            enabled = cfg.enabled,
            interval_secs = cfg.interval_secs,
            mode = %cfg.flash_mode,
            "flashbar started"
        );
    }

    /// Stop the reminder, cancel flashes on both targets, drop every settings
    /// subscription and hide the indicator. Leaves no armed timer. Safe to call
    /// repeatedly and before `enable`.
    pub fn teardown(&mut self) {
        let was_started = self.is_started();
        self.scheduler.stop(&mut self.timers);
        self.cancel_flashes();
        for id in self.subscriptions.drain(..) {
            self.settings.unsubscribe(id);
        }
        if was_started {
            self.surface.set_indicator_visible(false);
            info!("flashbar stopped");
        }
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    pub fn handle(&mut self, event: Event) -> Handled {
        match event {
            Event::Timer(fired) => self.on_timer(fired),
            Event::SettingChanged(key) => {
                if !self.is_started() {
                    return Handled::Ignored;
                }
                self.on_setting_changed(key);
                Handled::Reconfigured(key)
            }
        }
    }

    /// Dispatch every queued settings notification. Returns how many were handled.
    pub fn pump_settings(&mut self) -> usize {
        let changes = self.settings.take_changes();
        let count = changes.len();
        for key in changes {
            self.handle(Event::SettingChanged(key));
        }
        count
    }

    /// Write a setting through the store and apply the resulting change.
    pub fn update_setting(&mut self, key: SettingKey, value: SettingValue) -> Result<()> {
        self.settings.set(key, value)?;
        self.pump_settings();
        Ok(())
    }

    /// Flip `timer-enabled`. Returns the new value.
    pub fn toggle_reminder(&mut self) -> Result<bool> {
        let enabled = !self.settings.get_bool(SettingKey::TimerEnabled);
        self.update_setting(SettingKey::TimerEnabled, SettingValue::Bool(enabled))?;
        Ok(enabled)
    }

    /// Flash once right away with the current parameters, on `mode`'s target
    /// or the configured one. Works whether or not the reminder is enabled.
    pub fn flash_now(&mut self, mode: Option<FlashMode>) -> FlashTarget {
        let cfg = self.config();
        let target = mode.unwrap_or(cfg.flash_mode).target();
        self.start_flash(target, &cfg);
        target
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    fn on_timer(&mut self, fired: TimerFired) -> Handled {
        match fired.slot {
            TimerSlot::Reminder => match self.scheduler.on_fired(fired.id) {
                Some(_) => Handled::Triggered(self.on_trigger()),
                None => {
                    debug!(id = %fired.id, "stale reminder fire");
                    Handled::Ignored
                }
            },
            TimerSlot::TopBarFlash => self.step(FlashTarget::TopBar, fired),
            TimerSlot::IndicatorFlash => self.step(FlashTarget::Indicator, fired),
        }
    }

    fn step(&mut self, target: FlashTarget, fired: TimerFired) -> Handled {
        let animator = match target {
            FlashTarget::TopBar => &mut self.top_bar,
            FlashTarget::Indicator => &mut self.indicator,
        };
        match animator.on_step(&mut self.timers, &mut self.surface, fired.id) {
            StepOutcome::Stale => Handled::Ignored,
            outcome => Handled::Stepped(target, outcome),
        }
    }

    /// Parameters are read now, not when the reminder was armed.
    fn on_trigger(&mut self) -> FlashTarget {
        self.triggers += 1;
        let cfg = self.config();
        let target = cfg.flash_mode.target();
        info!(
            trigger = self.triggers,
            flash_target = %target,
            duration_ms = cfg.flash_duration_ms,
            count = cfg.flash_count,
            "reminder triggered"
        );
        self.start_flash(target, &cfg);
        target
    }

    fn start_flash(&mut self, target: FlashTarget, cfg: &ReminderConfig) {
        self.cancel_flashes();
        let animator = match target {
            FlashTarget::TopBar => &mut self.top_bar,
            FlashTarget::Indicator => &mut self.indicator,
        };
        animator.flash(
            &mut self.timers,
            &mut self.surface,
            cfg.flash_duration_ms,
            cfg.flash_count,
        );
    }

    fn cancel_flashes(&mut self) {
        self.top_bar.cancel(&mut self.timers, &mut self.surface);
        self.indicator.cancel(&mut self.timers, &mut self.surface);
    }

    fn on_setting_changed(&mut self, key: SettingKey) {
        let cfg = self.config();
        debug!(key = %key, "setting changed");
        match key {
            SettingKey::TimerEnabled => {
                if cfg.enabled {
                    self.scheduler.start(&mut self.timers, cfg.interval_secs);
                } else {
                    self.scheduler.stop(&mut self.timers);
                    self.cancel_flashes();
                }
                self.surface.set_reminder_active(cfg.enabled);
            }
            SettingKey::FlashInterval => {
                if self.scheduler.is_running() {
                    self.scheduler.restart(&mut self.timers, cfg.interval_secs);
                }
            }
            SettingKey::FlashMode => self.cancel_flashes(),
            SettingKey::FlashColor => self.surface.set_flash_color(cfg.flash_color),
            SettingKey::ShowIndicator => self.surface.set_indicator_visible(cfg.show_indicator),
            // Picked up by the next trigger.
            SettingKey::FlashDuration | SettingKey::FlashCount => {}
        }
    }
}

impl<V, S> FlashCoordinator<ManualTimers, V, S>
where
    V: Surface,
    S: SettingsStore,
{
    /// Deliver every virtual-time fire due up to `until_ms`, in order.
    /// Returns the number of fires handled.
    pub fn run_until(&mut self, until_ms: u64) -> usize {
        let mut handled = 0;
        while let Some(fired) = self.timers.pop_due(until_ms) {
            self.handle(Event::Timer(fired));
            handled += 1;
        }
        handled
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
