/// Cancellable one-shot timers, polled from the main loop.
///
/// A `TimerSet` is the disposable handle set for one screen: every deferred
/// step it schedules can be revoked individually (`cancel`) or all at once
/// on teardown (`cancel_all`). Nothing fires unless `take_due` is called,
/// so a cancelled or dropped set can never run a late callback.
///
/// Deadlines are absolute `Instant`s supplied by the caller, which keeps
/// the set deterministic under test.

use std::time::{Duration, Instant};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TimerId(u64);

#[derive(Clone, Debug)]
struct Pending<K> {
    id: TimerId,
    deadline: Instant,
    key: K,
}

#[derive(Clone, Debug)]
pub struct TimerSet<K> {
    next_id: u64,
    pending: Vec<Pending<K>>,
}

impl<K> Default for TimerSet<K> {
    fn default() -> Self {
        TimerSet { next_id: 0, pending: Vec::new() }
    }
}

impl<K> TimerSet<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: Instant, delay: Duration, key: K) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending { id, deadline: now + delay, key });
        id
    }

    /// Revoke one timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    /// Revoke everything. Returns how many timers were still pending.
    pub fn cancel_all(&mut self) -> usize {
        let n = self.pending.len();
        self.pending.clear();
        n
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Remove and return every timer due at `now`, earliest deadline first.
    /// Ties keep scheduling order.
    pub fn take_due(&mut self, now: Instant) -> Vec<K> {
        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.deadline <= now);
        self.pending = rest;
        due.sort_by_key(|p| (p.deadline, p.id.0));
        due.into_iter().map(|p| p.key).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn fires_only_when_due() {
        let t0 = Instant::now();
        let mut timers = TimerSet::new();
        timers.schedule(t0, ms(100), "a");
        assert!(timers.take_due(t0 + ms(99)).is_empty());
        assert_eq!(timers.take_due(t0 + ms(100)), vec!["a"]);
        assert_eq!(timers.len(), 0);
    }

    #[test]
    fn late_poll_fires_in_deadline_order() {
        let t0 = Instant::now();
        let mut timers = TimerSet::new();
        timers.schedule(t0, ms(300), "late");
        timers.schedule(t0, ms(100), "early");
        timers.schedule(t0, ms(100), "early-second");
        assert_eq!(timers.take_due(t0 + ms(1000)), vec!["early", "early-second", "late"]);
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let t0 = Instant::now();
        let mut timers = TimerSet::new();
        let id = timers.schedule(t0, ms(10), 1);
        timers.schedule(t0, ms(20), 2);
        assert!(timers.cancel(id));
        assert!(!timers.cancel(id));
        assert_eq!(timers.take_due(t0 + ms(50)), vec![2]);
    }

    #[test]
    fn cancel_all_reports_pending_count() {
        let t0 = Instant::now();
        let mut timers = TimerSet::new();
        timers.schedule(t0, ms(10), ());
        timers.schedule(t0, ms(20), ());
        assert_eq!(timers.cancel_all(), 2);
        assert!(timers.take_due(t0 + ms(100)).is_empty());
    }
}
