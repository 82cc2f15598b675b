//! Bounded on/off flash runs against a single visual target.
//!
//! A run of `count` cycles toggles the target's flag every half-period:
//! even steps turn it on, odd steps turn it off, and the step after the last
//! toggle tears the run down. Both targets use the same phase, so a run always
//! starts with "on" and always ends "off".

use crate::timer::{TimerHandle, TimerHost, TimerId};
use crate::types::FlashTarget;
use crate::visual::{Surface, VisualFlag};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Shortest allowed gap between toggles.
pub const MIN_HALF_PERIOD_MS: u32 = 50;

/// `max(50, duration_ms / 2)`.
pub fn half_period_ms(duration_ms: u32) -> u32 {
    (duration_ms / 2).max(MIN_HALF_PERIOD_MS)
}

// ---------------------------------------------------------------------------
// FlashRun
// ---------------------------------------------------------------------------

/// State of an in-progress animation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlashRun {
    pub target: FlashTarget,
    /// Toggle steps taken so far.
    pub step: u32,
    /// `2 * count`, saturating at `u32::MAX`.
    pub total_steps: u32,
    pub half_period_ms: u32,
    pub visual_on: bool,
}

impl FlashRun {
    /// Full on→off cycles not yet completed.
    pub fn cycles_remaining(&self) -> u32 {
        (self.total_steps - self.step.min(self.total_steps)).div_ceil(2)
    }
}

/// Result of delivering a timer fire to an animator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The fire did not belong to the current run.
    Stale,
    /// The flag was toggled to the given state.
    Toggled(bool),
    /// The run finished; the flag is off and the step timer is gone.
    Finished,
}

// ---------------------------------------------------------------------------
// FlashAnimator
// ---------------------------------------------------------------------------

/// Drives flash runs on one target. Owns that target's step timer.
#[derive(Debug)]
pub struct FlashAnimator {
    target: FlashTarget,
    handle: TimerHandle,
    run: Option<FlashRun>,
}

impl FlashAnimator {
    pub fn new(target: FlashTarget) -> Self {
        Self {
            target,
            handle: TimerHandle::default(),
            run: None,
        }
    }

    pub fn target(&self) -> FlashTarget {
        self.target
    }

    pub fn run(&self) -> Option<&FlashRun> {
        self.run.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.run.is_some()
    }

    /// Start a run of `count` cycles (at least one) lasting about
    /// `count * duration_ms`. Any run already active on this target is
    /// cancelled first.
    pub fn flash<H, V>(&mut self, host: &mut H, surface: &mut V, duration_ms: u32, count: u32)
    where
        H: TimerHost + ?Sized,
        V: Surface + ?Sized,
    {
        self.cancel(host, surface);

        let half = half_period_ms(duration_ms);
        let count = count.max(1);
        self.handle.arm(
            host,
            self.target.timer_slot(),
            Duration::from_millis(u64::from(half)),
        );
        self.run = Some(FlashRun {
            target: self.target,
            step: 0,
            total_steps: count.saturating_mul(2),
            half_period_ms: half,
            visual_on: false,
        });
        debug!(flash_target = %self.target, half_period_ms = half, count, "flash started");
    }

    /// Stop any run and force the flag off. Safe to call at any time.
    pub fn cancel<H, V>(&mut self, host: &mut H, surface: &mut V) -> bool
    where
        H: TimerHost + ?Sized,
        V: Surface + ?Sized,
    {
        let had_timer = self.handle.cancel(host);
        let had_run = self.run.take().is_some();
        surface.flag(self.target).set(false);
        if had_run {
            debug!(flash_target = %self.target, "flash cancelled");
        }
        had_timer || had_run
    }

    /// Advance the run for a fire of timer `id`.
    pub fn on_step<H, V>(&mut self, host: &mut H, surface: &mut V, id: TimerId) -> StepOutcome
    where
        H: TimerHost + ?Sized,
        V: Surface + ?Sized,
    {
        if !self.handle.owns(id) {
            return StepOutcome::Stale;
        }
        let Some(run) = self.run.as_mut() else {
            // A timer without a run cannot advance anything.
            self.handle.cancel(host);
            return StepOutcome::Stale;
        };

        if run.step >= run.total_steps {
            surface.flag(self.target).set(false);
            self.handle.cancel(host);
            self.run = None;
            debug!(flash_target = %self.target, "flash finished");
            return StepOutcome::Finished;
        }

        let on = run.step % 2 == 0;
        surface.flag(self.target).set(on);
        run.visual_on = on;
        run.step += 1;
        StepOutcome::Toggled(on)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
