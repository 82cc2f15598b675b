//! Timer primitives: the three logical timer lines, the handle slot that owns
//! at most one armed timer per line, and a virtual-time host for deterministic
//! runs.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use tracing::debug;

// ---------------------------------------------------------------------------
// TimerSlot / TimerId / TimerFired
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimerSlot {
    Reminder,
    TopBarFlash,
    IndicatorFlash,
}

impl TimerSlot {
    pub fn as_str(self) -> &'static str {
        match self {
            TimerSlot::Reminder => "reminder",
            TimerSlot::TopBarFlash => "top-bar-flash",
            TimerSlot::IndicatorFlash => "indicator-flash",
        }
    }
}

impl fmt::Display for TimerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one arming of a timer. Never reused by a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TimerId(pub u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Delivered by a host each time a repeating timer elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFired {
    pub slot: TimerSlot,
    pub id: TimerId,
}

// ---------------------------------------------------------------------------
// TimerHost
// ---------------------------------------------------------------------------

/// A source of repeating timers. Fires are delivered out of band as
/// [`TimerFired`] values; the host never calls back into the state machine.
pub trait TimerHost {
    /// Arm a timer that fires every `period` until cancelled.
    fn arm(&mut self, slot: TimerSlot, period: Duration) -> TimerId;

    /// Cancel `id`. Unknown or already-cancelled ids are ignored.
    fn cancel(&mut self, id: TimerId);
}

// ---------------------------------------------------------------------------
// TimerHandle
// ---------------------------------------------------------------------------

/// Owns at most one armed timer. The slot is emptied in the same call that
/// cancels the timer, and fires for any id it no longer holds are stale.
#[derive(Debug, Default)]
pub struct TimerHandle {
    id: Option<TimerId>,
}

impl TimerHandle {
    pub fn is_armed(&self) -> bool {
        self.id.is_some()
    }

    pub fn id(&self) -> Option<TimerId> {
        self.id
    }

    /// True when `id` is the timer this slot currently owns.
    pub fn owns(&self, id: TimerId) -> bool {
        self.id == Some(id)
    }

    /// Arm a new timer, cancelling whatever the slot held before.
    pub fn arm<H: TimerHost + ?Sized>(&mut self, host: &mut H, slot: TimerSlot, period: Duration) -> TimerId {
        self.cancel(host);
        let id = host.arm(slot, period);
        debug!(slot = %slot, id = %id, period_ms = period.as_millis() as u64, "timer armed");
        self.id = Some(id);
        id
    }

    /// Cancel the held timer. Returns false when the slot was already empty.
    pub fn cancel<H: TimerHost + ?Sized>(&mut self, host: &mut H) -> bool {
        match self.id.take() {
            Some(id) => {
                host.cancel(id);
                debug!(id = %id, "timer cancelled");
                true
            }
            None => false,
        }
    }
}

// ---------------------------------------------------------------------------
// ManualTimers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Armed {
    slot: TimerSlot,
    period_ms: u64,
    due_ms: u64,
}

/// Virtual-time timer host. Nothing fires on its own: the driver pops due
/// timers in time order with [`ManualTimers::pop_due`] and hands each one to the
/// state machine before popping the next, so a cancellation made while
/// handling one fire is honoured for every later fire.
#[derive(Debug, Default)]
pub struct ManualTimers {
    now_ms: u64,
    next_id: u64,
    armed: BTreeMap<TimerId, Armed>,
}

impl ManualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of timers currently armed.
    pub fn live_count(&self) -> usize {
        self.armed.len()
    }

    pub fn live_in(&self, slot: TimerSlot) -> usize {
        self.armed.values().filter(|a| a.slot == slot).count()
    }

    pub fn is_live(&self, id: TimerId) -> bool {
        self.armed.contains_key(&id)
    }

    /// When the earliest armed timer is due next.
    pub fn next_due_ms(&self) -> Option<u64> {
        self.armed.values().map(|a| a.due_ms).min()
    }

    /// Pop the earliest timer due at or before `until_ms`, advance the clock to
    /// its due time and re-arm it for its next period. When nothing is due the
    /// clock moves to `until_ms` and `None` is returned.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<TimerFired> {
        let next = self
            .armed
            .iter()
            .filter(|(_, a)| a.due_ms <= until_ms)
            .min_by_key(|(id, a)| (a.due_ms, **id))
            .map(|(id, _)| *id);

        let Some(id) = next else {
            self.now_ms = self.now_ms.max(until_ms);
            return None;
        };
        let armed = self.armed.get_mut(&id)?;
        self.now_ms = self.now_ms.max(armed.due_ms);
        armed.due_ms = armed.due_ms.saturating_add(armed.period_ms);
        Some(TimerFired {
            slot: armed.slot,
            id,
        })
    }
}

impl TimerHost for ManualTimers {
    fn arm(&mut self, slot: TimerSlot, period: Duration) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        let period_ms = (period.as_millis() as u64).max(1);
        self.armed.insert(
            id,
            Armed {
                slot,
                period_ms,
                due_ms: self.now_ms.saturating_add(period_ms),
            },
        );
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.armed.remove(&id);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
