//! Outbound edit coalescing.
//!
//! Pure debouncer: the first pending edit of a file arms a `BroadcastFlush`
//! timer one window later, later edits only replace the pending content, and
//! the latest content is emitted once when the timer fires. A file is
//! therefore broadcast at most once per window, never per keystroke.

use std::time::Duration;

use rustc_hash::FxHashMap;

use super::event::{CollaboratorChangeEvent, CollaboratorId, FileChange};
use crate::project::FileId;
use crate::schedule::{TimerId, TimerKind, TimerQueue};

struct Pending {
    content: String,
    timer: TimerId,
}

pub struct BroadcastDebouncer {
    me: CollaboratorId,
    window: Duration,
    /// FileId → latest unsent content (dedup is free via key uniqueness)
    pending: FxHashMap<FileId, Pending>,
}

impl BroadcastDebouncer {
    pub fn new(me: CollaboratorId, window: Duration) -> Self {
        Self {
            me,
            window,
            pending: FxHashMap::default(),
        }
    }

    /// Queue a local edit. Returns `true` if a new flush timer was armed.
    pub fn push(
        &mut self,
        id: &FileId,
        content: impl Into<String>,
        now: Duration,
        timers: &mut TimerQueue,
    ) -> bool {
        let content = content.into();
        if let Some(pending) = self.pending.get_mut(id) {
            pending.content = content;
            return false;
        }

        let timer = timers.schedule(now + self.window, TimerKind::BroadcastFlush(id.clone()));
        self.pending.insert(id.clone(), Pending { content, timer });
        true
    }

    /// The flush timer of `id` fired: take the coalesced edit.
    pub fn flush(&mut self, id: &FileId) -> Option<CollaboratorChangeEvent> {
        let pending = self.pending.remove(id)?;
        Some(CollaboratorChangeEvent::now(
            self.me.clone(),
            vec![FileChange::new(id.clone(), pending.content)],
        ))
    }

    /// Forget a pending edit (file removed).
    pub fn discard(&mut self, id: &FileId, timers: &mut TimerQueue) {
        if let Some(pending) = self.pending.remove(id) {
            timers.cancel(pending.timer);
        }
    }

    /// Forget everything and cancel all flush timers.
    pub fn cancel_all(&mut self, timers: &mut TimerQueue) {
        for (_, pending) in self.pending.drain() {
            timers.cancel(pending.timer);
        }
    }

    pub fn is_pending(&self, id: &FileId) -> bool {
        self.pending.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
