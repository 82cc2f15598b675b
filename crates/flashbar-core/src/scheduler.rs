//! The repeating reminder timer. At most one is armed at a time, and each
//! of its fires becomes a flash trigger.

use crate::timer::{TimerHandle, TimerHost, TimerId, TimerSlot};
use std::time::Duration;
use tracing::{debug, info};

/// Shortest reminder period accepted.
pub const MIN_INTERVAL_SECS: u32 = 10;

/// Emitted each time the reminder interval elapses. Carries nothing: the
/// consumer reads the current flash parameters when it receives one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trigger;

/// Owns the repeating reminder timer.
#[derive(Debug, Default)]
pub struct ReminderScheduler {
    handle: TimerHandle,
    interval_secs: Option<u32>,
}

impl ReminderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_armed()
    }

    /// Period of the armed timer, if any.
    pub fn interval_secs(&self) -> Option<u32> {
        self.interval_secs
    }

    /// Arm the reminder timer. Returns false without touching the running
    /// timer when one is already armed. Intervals below the minimum are raised
    /// to it.
    pub fn start<H: TimerHost + ?Sized>(&mut self, host: &mut H, interval_secs: u32) -> bool {
        if self.handle.is_armed() {
            debug!("reminder already running");
            return false;
        }
        let secs = interval_secs.max(MIN_INTERVAL_SECS);
        self.handle.arm(
            host,
            TimerSlot::Reminder,
            Duration::from_secs(u64::from(secs)),
        );
        self.interval_secs = Some(secs);
        info!(interval_secs = secs, "reminder started");
        true
    }

    /// Cancel the reminder timer. Returns false when it was not running.
    pub fn stop<H: TimerHost + ?Sized>(&mut self, host: &mut H) -> bool {
        self.interval_secs = None;
        let stopped = self.handle.cancel(host);
        if stopped {
            info!("reminder stopped");
        }
        stopped
    }

    pub fn restart<H: TimerHost + ?Sized>(&mut self, host: &mut H, interval_secs: u32) {
        self.stop(host);
        self.start(host, interval_secs);
    }

    /// A trigger for a fire of the live reminder timer, `None` for anything else.
    pub fn on_fired(&self, id: TimerId) -> Option<Trigger> {
        self.handle.owns(id).then_some(Trigger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::ManualTimers;

    #[test]
    fn double_start_keeps_one_timer() {
        let mut host = ManualTimers::new();
        let mut scheduler = ReminderScheduler::new();
        assert!(scheduler.start(&mut host, 30));
        assert!(!scheduler.start(&mut host, 30));
        assert!(!scheduler.start(&mut host, 90));
        assert_eq!(host.live_count(), 1);
        assert_eq!(scheduler.interval_secs(), Some(30));
    }

    #[test]
    fn stop_is_idempotent() {
        let mut host = ManualTimers::new();
        let mut scheduler = ReminderScheduler::new();
        assert!(!scheduler.stop(&mut host));
        scheduler.start(&mut host, 30);
        assert!(scheduler.stop(&mut host));
        assert!(!scheduler.stop(&mut host));
        assert_eq!(host.live_count(), 0);
        assert!(!scheduler.is_running());
    }

    #[test]
    fn fires_every_interval() {
        let mut host = ManualTimers::new();
        let mut scheduler = ReminderScheduler::new();
        scheduler.start(&mut host, 30);
        let mut at = Vec::new();
        while let Some(fired) = host.pop_due(100_000) {
            assert_eq!(scheduler.on_fired(fired.id), Some(Trigger));
            at.push(host.now_ms());
        }
        assert_eq!(at, vec![30_000, 60_000, 90_000]);
    }

    #[test]
    fn restart_uses_new_period_from_now() {
        let mut host = ManualTimers::new();
        let mut scheduler = ReminderScheduler::new();
        scheduler.start(&mut host, 30);
        assert!(host.pop_due(45_000).is_some());
        assert!(host.pop_due(45_000).is_none());

        scheduler.restart(&mut host, 60);
        assert_eq!(host.live_count(), 1);
        assert_eq!(host.next_due_ms(), Some(105_000));
        assert_eq!(scheduler.interval_secs(), Some(60));
    }

    #[test]
    fn interval_is_floored() {
        let mut host = ManualTimers::new();
        let mut scheduler = ReminderScheduler::new();
        scheduler.start(&mut host, 0);
        assert_eq!(scheduler.interval_secs(), Some(MIN_INTERVAL_SECS));
        assert_eq!(host.next_due_ms(), Some(10_000));
    }

    #[test]
    fn stale_fire_yields_no_trigger() {
        let mut host = ManualTimers::new();
        let mut scheduler = ReminderScheduler::new();
        scheduler.start(&mut host, 30);
        let fired = host.pop_due(30_000).unwrap();
        scheduler.stop(&mut host);
        assert_eq!(scheduler.on_fired(fired.id), None);
    }
}
