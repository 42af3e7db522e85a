//! Event subscriptions and a manually driven timer queue.

use std::collections::BTreeSet;
use std::time::Duration;

use crate::app::platform::{Scheduler, SignalTarget};
use crate::domain::model::Trigger;

/// Tracks which triggers currently have a subscriber on a page.
#[derive(Debug, Clone, Default)]
pub struct EventRegistry {
    subscribed: BTreeSet<Trigger>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscriptions(&self) -> impl Iterator<Item = Trigger> + '_ {
        self.subscribed.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribed.is_empty()
    }
}

impl SignalTarget for EventRegistry {
    fn subscribe(&mut self, trigger: Trigger) {
        self.subscribed.insert(trigger);
    }

    fn unsubscribe(&mut self, trigger: Trigger) {
        self.subscribed.remove(&trigger);
    }

    fn is_subscribed(&self, trigger: Trigger) -> bool {
        self.subscribed.contains(&trigger)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingTimer {
    due: Duration,
    sequence: u64,
    trigger: Trigger,
}

/// Timer queue driven by an explicit clock rather than wall time.
///
/// Timers due at the same instant fire in the order they were scheduled.
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    now: Duration,
    next_sequence: u64,
    pending: Vec<PendingTimer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed on this queue's clock.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Move the clock forward and return every trigger that became due.
    pub fn advance(&mut self, by: Duration) -> Vec<Trigger> {
        self.now += by;
        let now = self.now;

        let (mut due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|timer| timer.due <= now);
        self.pending = waiting;

        due.sort_by_key(|timer| (timer.due, timer.sequence));
        due.into_iter().map(|timer| timer.trigger).collect()
    }
}

impl Scheduler for TimerQueue {
    fn schedule(&mut self, delay: Duration, trigger: Trigger) {
        self.pending.push(PendingTimer {
            due: self.now + delay,
            sequence: self.next_sequence,
            trigger,
        });
        self.next_sequence += 1;
    }
}
