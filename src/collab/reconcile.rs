//! Remote change reconciler.
//!
//! Applies a collaborator's edits to the local project:
//! - own events coming back over the channel are dropped (echo)
//! - the active file is updated in the model and in the editor, keeping the caret
//! - other files are updated in the model only
//!
//! Applying to the active file opens a quiesce window during which local
//! edits are not broadcast, so two clients cannot ping-pong the same change.

use std::time::Duration;

use super::editor::EditorSurface;
use super::event::{CollaboratorChangeEvent, CollaboratorId};
use crate::project::{FileId, Project};
use crate::schedule::{TimerId, TimerKind, TimerQueue};

/// What a reconcile call did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// The event was our own and was ignored.
    pub echo: bool,
    /// The active file changed.
    pub active: Option<FileId>,
    /// Other files that changed, in event order.
    pub background: Vec<FileId>,
    /// Entries skipped: unknown id or identical content.
    pub skipped: usize,
}

impl ReconcileOutcome {
    /// Whether the project was mutated.
    pub fn changed(&self) -> bool {
        self.active.is_some() || !self.background.is_empty()
    }
}

pub struct RemoteReconciler {
    me: CollaboratorId,
    quiesce: Duration,
    quiesce_until: Option<Duration>,
    quiesce_timer: Option<TimerId>,
}

impl RemoteReconciler {
    pub fn new(me: CollaboratorId, quiesce: Duration) -> Self {
        Self {
            me,
            quiesce,
            quiesce_until: None,
            quiesce_timer: None,
        }
    }

    pub fn me(&self) -> &CollaboratorId {
        &self.me
    }

    pub fn reconcile(
        &mut self,
        event: &CollaboratorChangeEvent,
        project: &mut Project,
        mut editor: Option<&mut dyn EditorSurface>,
        now: Duration,
        timers: &mut TimerQueue,
    ) -> ReconcileOutcome {
        if event.originator == self.me {
            crate::debug!("collab"; "ignoring echo of own change");
            return ReconcileOutcome {
                echo: true,
                ..Default::default()
            };
        }

        let active_id = project.active_id().clone();
        let mut outcome = ReconcileOutcome::default();

        for change in &event.files {
            let Some(current) = project.file(&change.id) else {
                outcome.skipped += 1;
                continue;
            };
            if current.content == change.content {
                outcome.skipped += 1;
                continue;
            }

            if change.id == active_id {
                self.begin_quiesce(now, timers);
                project.update_file_content(&change.id, change.content.as_str());
                if let Some(editor) = editor.as_deref_mut() {
                    let cursor = editor.cursor();
                    editor.set_text(&change.content);
                    editor.set_cursor(cursor);
                }
                outcome.active = Some(change.id.clone());
            } else {
                project.update_file_content(&change.id, change.content.as_str());
                outcome.background.push(change.id.clone());
            }
        }

        if outcome.changed() {
            crate::debug!(
                "collab";
                "applied change from {}: active={} background={}",
                event.originator,
                outcome.active.is_some(),
                outcome.background.len()
            );
        }
        outcome
    }

    /// True while a just-applied remote change must not be echoed back.
    pub fn is_external_change(&self, now: Duration) -> bool {
        self.quiesce_until.is_some_and(|until| now < until)
    }

    /// The `QuiesceEnd` timer fired.
    pub fn on_quiesce_end(&mut self, id: TimerId) {
        if self.quiesce_timer == Some(id) {
            self.quiesce_timer = None;
            self.quiesce_until = None;
        }
    }

    /// Drop the window and its timer.
    pub fn cancel(&mut self, timers: &mut TimerQueue) {
        if let Some(id) = self.quiesce_timer.take() {
            timers.cancel(id);
        }
        self.quiesce_until = None;
    }

    fn begin_quiesce(&mut self, now: Duration, timers: &mut TimerQueue) {
        if let Some(id) = self.quiesce_timer.take() {
            timers.cancel(id);
        }
        let until = now + self.quiesce;
        self.quiesce_until = Some(until);
        self.quiesce_timer = Some(timers.schedule(until, TimerKind::QuiesceEnd));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::editor::{Cursor, TextBuffer};
    use crate::collab::event::FileChange;
    use crate::project::{ProjectFile, ProjectKind};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn project() -> Project {
        Project::from_files(
            "shared",
            ProjectKind::Multi,
            vec![
                ProjectFile::named("index.html", "line one\nline two"),
                ProjectFile::named("styles.css", "body{}"),
            ],
        )
        .unwrap()
    }

    fn change_from(who: &str, files: Vec<FileChange>) -> CollaboratorChangeEvent {
        CollaboratorChangeEvent {
            files,
            originator: who.into(),
            timestamp: 0,
        }
    }

    #[test]
    fn test_echo_never_mutates() {
        let mut project = project();
        let before = project.clone();
        let mut reconciler = RemoteReconciler::new("me".into(), ms(100));
        let mut timers = TimerQueue::new();

        let id = project.active_id().clone();
        let event = change_from("me", vec![FileChange::new(id, "hijacked")]);
        let outcome = reconciler.reconcile(&event, &mut project, None, ms(0), &mut timers);

        assert!(outcome.echo);
        assert!(!outcome.changed());
        assert_eq!(project, before);
        assert!(timers.is_empty());
        assert!(!reconciler.is_external_change(ms(0)));
    }

    #[test]
    fn test_active_file_updates_editor_and_keeps_cursor() {
        let mut project = project();
        let mut reconciler = RemoteReconciler::new("me".into(), ms(100));
        let mut timers = TimerQueue::new();
        let mut editor = TextBuffer::new("line one\nline two");
        editor.set_cursor(Cursor::new(1, 3));

        let id = project.active_id().clone();
        let event = change_from("bob", vec![FileChange::new(id.clone(), "line one\nline 2!\nline three")]);
        let outcome = reconciler.reconcile(&event, &mut project, Some(&mut editor), ms(10), &mut timers);

        assert_eq!(outcome.active, Some(id.clone()));
        assert_eq!(project.file(&id).unwrap().content, "line one\nline 2!\nline three");
        assert_eq!(editor.text(), "line one\nline 2!\nline three");
        assert_eq!(editor.cursor(), Cursor::new(1, 3));
    }

    #[test]
    fn test_cursor_clamped_to_shorter_text() {
        let mut project = project();
        let mut reconciler = RemoteReconciler::new("me".into(), ms(100));
        let mut timers = TimerQueue::new();
        let mut editor = TextBuffer::new("line one\nline two");
        editor.set_cursor(Cursor::new(1, 8));

        let id = project.active_id().clone();
        let event = change_from("bob", vec![FileChange::new(id, "hi")]);
        reconciler.reconcile(&event, &mut project, Some(&mut editor), ms(0), &mut timers);

        assert_eq!(editor.cursor(), Cursor::new(0, 2));
    }

    #[test]
    fn test_quiesce_window() {
        let mut project = project();
        let mut reconciler = RemoteReconciler::new("me".into(), ms(100));
        let mut timers = TimerQueue::new();

        let id = project.active_id().clone();
        let event = change_from("bob", vec![FileChange::new(id, "new")]);
        reconciler.reconcile(&event, &mut project, None, ms(50), &mut timers);

        assert!(reconciler.is_external_change(ms(50)));
        assert!(reconciler.is_external_change(ms(149)));
        assert!(!reconciler.is_external_change(ms(150)));
        assert_eq!(timers.next_deadline(), Some(ms(150)));

        let (timer, kind) = timers.pop_due(ms(150)).remove(0);
        assert_eq!(kind, TimerKind::QuiesceEnd);
        reconciler.on_quiesce_end(timer);
        assert!(!reconciler.is_external_change(ms(120)));
    }

    #[test]
    fn test_rearming_quiesce_cancels_previous_timer() {
        let mut project = project();
        let mut reconciler = RemoteReconciler::new("me".into(), ms(100));
        let mut timers = TimerQueue::new();
        let id = project.active_id().clone();

        reconciler.reconcile(&change_from("bob", vec![FileChange::new(id.clone(), "a")]), &mut project, None, ms(0), &mut timers);
        reconciler.reconcile(&change_from("bob", vec![FileChange::new(id, "b")]), &mut project, None, ms(80), &mut timers);

        assert_eq!(timers.len(), 1);
        assert_eq!(timers.next_deadline(), Some(ms(180)));
        assert!(reconciler.is_external_change(ms(150)));
    }

    #[test]
    fn test_background_file_skips_editor() {
        let mut project = project();
        let mut reconciler = RemoteReconciler::new("me".into(), ms(100));
        let mut timers = TimerQueue::new();
        let mut editor = TextBuffer::new("line one\nline two");

        let css = project.file_by_name("styles.css").unwrap().id.clone();
        let event = change_from("bob", vec![FileChange::new(css.clone(), "body{margin:0}")]);
        let outcome = reconciler.reconcile(&event, &mut project, Some(&mut editor), ms(0), &mut timers);

        assert_eq!(outcome.background, vec![css.clone()]);
        assert_eq!(outcome.active, None);
        assert_eq!(project.file(&css).unwrap().content, "body{margin:0}");
        assert_eq!(editor.text(), "line one\nline two");
        assert!(!reconciler.is_external_change(ms(0)));
    }

    #[test]
    fn test_identical_and_unknown_entries_skipped() {
        let mut project = project();
        let before = project.clone();
        let mut reconciler = RemoteReconciler::new("me".into(), ms(100));
        let mut timers = TimerQueue::new();

        let id = project.active_id().clone();
        let event = change_from(
            "bob",
            vec![
                FileChange::new(id, "line one\nline two"),
                FileChange::new("gone".into(), "x"),
            ],
        );
        let outcome = reconciler.reconcile(&event, &mut project, None, ms(0), &mut timers);

        assert_eq!(outcome.skipped, 2);
        assert!(!outcome.changed());
        assert_eq!(project, before);
        assert!(timers.is_empty());
    }
}
