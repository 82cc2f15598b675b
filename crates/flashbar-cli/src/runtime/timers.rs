use flashbar_core::timer::{TimerFired, TimerHost, TimerId, TimerSlot};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Timer host backed by tokio tasks. Each armed timer is a task that sends a
/// [`TimerFired`] into the loop's channel every period; cancelling aborts the
/// task. A fire that was already queued when its timer got cancelled still
/// arrives, and the coordinator drops it by id.
///
/// Must be used from inside a tokio runtime.
pub struct TokioTimers {
    tx: UnboundedSender<TimerFired>,
    tasks: HashMap<TimerId, JoinHandle<()>>,
    next_id: u64,
}

impl TokioTimers {
    pub fn new(tx: UnboundedSender<TimerFired>) -> Self {
        Self {
            tx,
            tasks: HashMap::new(),
            next_id: 0,
        }
    }

    pub fn live_count(&self) -> usize {
        self.tasks.len()
    }
}

impl TimerHost for TokioTimers {
    fn arm(&mut self, slot: TimerSlot, period: Duration) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        let period = period.max(Duration::from_millis(1));
        let tx = self.tx.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tx.send(TimerFired { slot, id }).is_err() {
                    break;
                }
            }
        });
        self.tasks.insert(id, handle);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(handle) = self.tasks.remove(&id) {
            handle.abort();
        }
    }
}

impl Drop for TokioTimers {
    fn drop(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}
