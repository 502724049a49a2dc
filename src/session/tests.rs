use std::sync::Arc;
use std::time::Duration;

use crossbeam::channel::Receiver;
use tempfile::TempDir;

use super::*;
use crate::collab::{CollaboratorChangeEvent, FileChange, TextBuffer};
use crate::preview::MemorySurface;
use crate::project::{Project, ProjectKind};
use crate::schedule::ManualClock;

const DOC: &str = "http://127.0.0.1:5280/__surface/document";

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn options(name: &str) -> SessionOptions {
    SessionOptions {
        collaborator: CollaboratorId::from(name),
        ..SessionOptions::default()
    }
}

struct Fixture {
    _dir: TempDir,
    clock: ManualClock,
    backend: Backend,
    project: Project,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let backend = Backend::local(dir.path().join("store"));
        Self {
            _dir: dir,
            clock: ManualClock::new(),
            backend,
            project: Project::new("shared", "", ProjectKind::Multi),
        }
    }

    fn session(&self, name: &str) -> EditorSession<MemorySurface> {
        EditorSession::new(
            self.project.clone(),
            MemorySurface::new(),
            self.backend.clone(),
            Arc::new(self.clock.clone()),
            options(name),
        )
    }

    fn listen(&self) -> Receiver<ChannelMessage> {
        self.backend.channel.subscribe(&self.project.id)
    }

    fn id_of(&self, name: &str) -> FileId {
        self.project.file_by_name(name).unwrap().id.clone()
    }
}

fn file_changes(rx: &Receiver<ChannelMessage>) -> Vec<CollaboratorChangeEvent> {
    rx.try_iter()
        .filter_map(|message| match message {
            ChannelMessage::FileChange(event) => Some(event),
            _ => None,
        })
        .collect()
}

#[test]
fn test_mount_renders_and_arms_timers() {
    let fx = Fixture::new();
    let mut alice = fx.session("alice");

    assert!(alice.mount());
    assert!(!alice.mount());
    assert!(alice.is_live());
    assert_eq!(alice.renderer().state(), RenderState::Displayed);
    assert!(alice.renderer().surface().document().unwrap().contains("Hello Web Sketch Studio!"));
    // preview refresh + presence heartbeat
    assert_eq!(alice.pending_timers(), 2);
    assert_eq!(alice.next_deadline(), Some(ms(1000)));
}

#[test]
fn test_edit_reaches_peer_after_debounce() {
    let fx = Fixture::new();
    let css = fx.id_of("styles.css");
    let mut alice = fx.session("alice");
    let mut bob = fx.session("bob");
    alice.mount();
    bob.mount();

    assert!(alice.edit(&css, "body { color: red; }"));
    fx.clock.advance(ms(200));
    assert!(alice.edit(&css, "body { color: blue; }"));

    fx.clock.advance(ms(299));
    alice.fire_due_timers();
    bob.drain_channel();
    assert_ne!(bob.project().file(&css).unwrap().content, "body { color: blue; }");

    fx.clock.advance(ms(1));
    alice.fire_due_timers();
    bob.drain_channel();
    assert_eq!(bob.project().file(&css).unwrap().content, "body { color: blue; }");

    // Alice's own echo is ignored.
    alice.drain_channel();
    assert_eq!(alice.project().file(&css).unwrap().content, "body { color: blue; }");
}

#[test]
fn test_edit_of_unknown_file_rejected() {
    let fx = Fixture::new();
    let mut alice = fx.session("alice");
    alice.mount();
    assert!(!alice.edit(&FileId::from("missing"), "x"));
}

#[test]
fn test_remote_change_updates_editor_without_echo() {
    let fx = Fixture::new();
    let index = fx.id_of("index.html");
    let rx = fx.listen();
    let mut bob = fx.session("bob");
    bob.attach_editor(Box::new(TextBuffer::new(bob.project().active_file().content.clone())));
    bob.mount();

    let event = CollaboratorChangeEvent::now(
        CollaboratorId::from("alice"),
        vec![FileChange::new(index.clone(), "<p>remote</p>")],
    );
    let outcome = bob.on_remote_change(&event);
    assert_eq!(outcome.active, Some(index.clone()));
    assert_eq!(bob.editor().unwrap().text(), "<p>remote</p>");
    assert!(bob.is_external_change());

    // The editor's change notification during quiesce is not broadcast.
    assert!(bob.edit(&index, "<p>remote</p>"));
    fx.clock.advance(ms(600));
    bob.fire_due_timers();
    assert!(file_changes(&rx).is_empty());
    assert!(!bob.is_external_change());

    // After quiesce, edits broadcast again.
    bob.edit(&index, "<p>mine</p>");
    fx.clock.advance(ms(500));
    bob.fire_due_timers();
    let sent = file_changes(&rx);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].originator, CollaboratorId::from("bob"));
    assert_eq!(sent[0].files[0].content, "<p>mine</p>");
}

#[test]
fn test_remote_change_supersedes_pending_local_edit() {
    let fx = Fixture::new();
    let index = fx.id_of("index.html");
    let mut alice = fx.session("alice");
    let mut bob = fx.session("bob");
    alice.mount();
    bob.mount();

    alice.edit(&index, "alice-v1");
    fx.clock.advance(ms(100));
    bob.edit(&index, "bob-v2");
    let from_bob = CollaboratorChangeEvent::now(
        CollaboratorId::from("bob"),
        vec![FileChange::new(index.clone(), "bob-v2")],
    );
    alice.on_remote_change(&from_bob);

    // Alice's flush would have carried the older "alice-v1".
    fx.clock.advance(ms(400));
    alice.fire_due_timers();
    bob.drain_channel();
    assert_eq!(alice.project().file(&index).unwrap().content, "bob-v2");
    assert_eq!(bob.project().file(&index).unwrap().content, "bob-v2");

    fx.clock.advance(ms(100));
    bob.fire_due_timers();
    alice.drain_channel();
    assert_eq!(alice.project().file(&index).unwrap().content, "bob-v2");
    assert_eq!(bob.project().file(&index).unwrap().content, "bob-v2");
}

#[test]
fn test_background_remote_change_drops_pending_broadcast() {
    let fx = Fixture::new();
    let css = fx.id_of("styles.css");
    let rx = fx.listen();
    let mut alice = fx.session("alice");
    alice.mount();

    alice.edit(&css, "p { color: red; }");
    fx.clock.advance(ms(100));
    let outcome = alice.on_remote_change(&CollaboratorChangeEvent::now(
        CollaboratorId::from("bob"),
        vec![FileChange::new(css.clone(), "p { color: blue; }")],
    ));
    assert_eq!(outcome.background, vec![css.clone()]);

    fx.clock.advance(ms(400));
    alice.fire_due_timers();
    assert!(file_changes(&rx).is_empty());
    assert_eq!(alice.project().file(&css).unwrap().content, "p { color: blue; }");
}

#[test]
fn test_link_click_navigates_preview() {
    let fx = Fixture::new();
    let mut alice = fx.session("alice");
    alice.mount();

    let click = InteractEvent::link_click(DOC, "about.html");
    assert_eq!(alice.renderer().surface().click(&click), 1);
    assert_eq!(alice.drain_interactions(), 1);

    assert_eq!(alice.renderer().current_entry(), Some("about.html"));
    assert!(alice.renderer().surface().document().unwrap().contains("About Us"));
}

#[test]
fn test_external_link_left_alone() {
    let fx = Fixture::new();
    let mut alice = fx.session("alice");
    alice.mount();

    let click = InteractEvent::link_click(DOC, "https://example.com/page.html");
    assert_eq!(alice.handle_interaction(&click), Interception::PassThrough);
    assert_eq!(alice.renderer().current_entry(), None);
}

#[test]
fn test_removed_file_not_broadcast() {
    let fx = Fixture::new();
    let about = fx.id_of("about.html");
    let rx = fx.listen();
    let mut alice = fx.session("alice");
    alice.mount();

    alice.edit(&about, "gone soon");
    alice.remove_file(&about).unwrap();
    fx.clock.advance(ms(500));
    alice.fire_due_timers();
    assert!(file_changes(&rx).is_empty());
}

#[test]
fn test_presence_and_leave() {
    let fx = Fixture::new();
    let mut bob = fx.session("bob");
    let mut alice = fx.session("alice");
    bob.mount();
    alice.mount();

    bob.drain_channel();
    let present = bob.collaborators();
    assert_eq!(present.len(), 1);
    assert_eq!(present[0].id, CollaboratorId::from("alice"));

    alice.unmount();
    assert!(!alice.is_live());
    assert_eq!(alice.pending_timers(), 0);
    assert_eq!(alice.renderer().state(), RenderState::Unmounted);
    assert!(alice.renderer().surface().is_disposed());

    bob.drain_channel();
    assert!(bob.collaborators().is_empty());
}

#[test]
fn test_heartbeat_rearms() {
    let fx = Fixture::new();
    let rx = fx.listen();
    let mut alice = fx.session("alice");
    alice.mount();
    let _ = rx.try_iter().count();

    fx.clock.advance(Duration::from_secs(30));
    alice.fire_due_timers();
    assert!(rx.try_iter().any(|m| matches!(m, ChannelMessage::Presence(_))));
    assert_eq!(alice.next_deadline(), Some(Duration::from_secs(30) + ms(1000)));
}

#[test]
fn test_save_and_reload() {
    let fx = Fixture::new();
    let css = fx.id_of("styles.css");
    let mut alice = fx.session("alice");
    alice.mount();

    alice.edit(&css, "saved");
    alice.save().unwrap();
    alice.edit(&css, "unsaved");

    assert!(alice.reload().unwrap());
    assert_eq!(alice.project().file(&css).unwrap().content, "saved");
    assert_eq!(alice.project().owner.as_deref(), Some("alice"));
}

#[test]
fn test_late_load_dropped_after_unmount() {
    let fx = Fixture::new();
    let css = fx.id_of("styles.css");
    let mut alice = fx.session("alice");
    alice.mount();
    alice.save().unwrap();
    alice.edit(&css, "local");
    alice.unmount();

    assert!(!alice.reload().unwrap());
    assert_eq!(alice.project().file(&css).unwrap().content, "local");
}

#[test]
fn test_auto_refresh_toggle() {
    let fx = Fixture::new();
    let mut alice = fx.session("alice");
    alice.mount();

    alice.set_auto_refresh(false);
    assert_eq!(alice.pending_timers(), 1);
    fx.clock.advance(ms(1000));
    alice.fire_due_timers();
    assert_eq!(alice.renderer().writes(), 1);

    assert!(alice.refresh());
    assert_eq!(alice.renderer().writes(), 2);
}
