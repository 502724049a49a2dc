//! Cancellable one-shot timers.
//!
//! The queue never runs anything by itself: the owner asks for the next
//! deadline, sleeps (or advances virtual time) until then, and pops whatever
//! is due. Periodic work re-arms itself when it fires.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::project::FileId;

/// What a timer is for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Auto-refresh of the live preview.
    PreviewRefresh,
    /// Emit the coalesced local edits of one file.
    BroadcastFlush(FileId),
    /// End of the echo-suppression window after a remote change.
    QuiesceEnd,
    /// Periodic presence announcement.
    PresenceHeartbeat,
}

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Deadline-ordered timer set.
///
/// Entries are keyed by `(deadline, id)`, so timers with equal deadlines fire
/// in scheduling order.
#[derive(Debug, Default)]
pub struct TimerQueue {
    entries: BTreeMap<(Duration, TimerId), TimerKind>,
    next_id: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `kind` to fire at absolute time `at`.
    pub fn schedule(&mut self, at: Duration, kind: TimerKind) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.insert((at, id), kind);
        id
    }

    /// Cancel a timer. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let key = self.entries.keys().find(|(_, tid)| *tid == id).copied();
        key.is_some_and(|key| self.entries.remove(&key).is_some())
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.entries.keys().any(|(_, tid)| *tid == id)
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.keys().next().map(|(at, _)| *at)
    }

    /// Remove and return every timer due at `now`, in firing order.
    pub fn pop_due(&mut self, now: Duration) -> Vec<(TimerId, TimerKind)> {
        let mut due = Vec::new();
        while let Some(entry) = self.entries.first_entry() {
            if entry.key().0 > now {
                break;
            }
            let ((_, id), kind) = entry.remove_entry();
            due.push((id, kind));
        }
        due
    }

    /// Precise sleep duration until the next deadline.
    pub fn sleep_duration(&self, now: Duration) -> Option<Duration> {
        self.next_deadline().map(|at| at.saturating_sub(now))
    }

    /// Cancel everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_pop_due_in_deadline_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(ms(300), TimerKind::QuiesceEnd);
        timers.schedule(ms(100), TimerKind::PreviewRefresh);
        timers.schedule(ms(200), TimerKind::PresenceHeartbeat);

        assert_eq!(timers.next_deadline(), Some(ms(100)));
        let due: Vec<_> = timers.pop_due(ms(250)).into_iter().map(|(_, k)| k).collect();
        assert_eq!(due, [TimerKind::PreviewRefresh, TimerKind::PresenceHeartbeat]);
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn test_ties_fire_in_scheduling_order() {
        let mut timers = TimerQueue::new();
        let a = timers.schedule(ms(50), TimerKind::QuiesceEnd);
        let b = timers.schedule(ms(50), TimerKind::PreviewRefresh);

        let ids: Vec<_> = timers.pop_due(ms(50)).into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, [a, b]);
    }

    #[test]
    fn test_cancel() {
        let mut timers = TimerQueue::new();
        let id = timers.schedule(ms(10), TimerKind::PreviewRefresh);

        assert!(timers.is_scheduled(id));
        assert!(timers.cancel(id));
        assert!(!timers.cancel(id));
        assert!(timers.pop_due(ms(1000)).is_empty());
        assert_eq!(timers.next_deadline(), None);
    }

    #[test]
    fn test_nothing_due_before_deadline() {
        let mut timers = TimerQueue::new();
        timers.schedule(ms(500), TimerKind::BroadcastFlush(FileId::from("f")));

        assert!(timers.pop_due(ms(499)).is_empty());
        assert_eq!(timers.sleep_duration(ms(200)), Some(ms(300)));
        assert_eq!(timers.pop_due(ms(500)).len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut timers = TimerQueue::new();
        timers.schedule(ms(1), TimerKind::PreviewRefresh);
        timers.schedule(ms(2), TimerKind::PresenceHeartbeat);
        timers.clear();
        assert!(timers.is_empty());
    }
}
