//! Editor session.
//!
//! One open project: the file set, its live preview, and its collaboration
//! plumbing, all driven by a single timer queue.
//!
//! ```text
//!                 ┌──────────── fire_due_timers ─────────────┐
//!                 ▼                                          │
//!  edit ──▶ Project ──▶ BroadcastDebouncer ──flush──▶ channel ──▶ peers
//!  peers ──▶ drain_channel ──▶ RemoteReconciler ──▶ Project / editor
//!  surface clicks ──▶ drain_interactions ──▶ NavigationInterceptor ──▶ PreviewRenderer
//! ```
//!
//! Nothing here blocks or spawns: the owner calls the `drain_*` and
//! `fire_due_timers` methods from its event loop and sleeps until
//! [`EditorSession::next_deadline`].

use std::sync::Arc;
use std::time::Duration;

use crossbeam::channel::{Receiver, unbounded};

use crate::backend::{Backend, BackendError};
use crate::collab::{
    BroadcastDebouncer, ChannelMessage, Collaborator, CollaboratorChangeEvent, CollaboratorId,
    EditorSurface, PresenceRoster, ReconcileOutcome, RemoteReconciler,
};
use crate::config::SketchConfig;
use crate::preview::{
    DocumentSource, InteractEvent, Interception, NavigationInterceptor, PreviewRenderer,
    RenderState, RendererOptions, Surface,
};
use crate::project::{FileId, FileKind, FileSetError, Project, ProjectFile};
use crate::schedule::{Clock, TimerId, TimerKind, TimerQueue};

/// Timing and identity of a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub collaborator: CollaboratorId,
    pub renderer: RendererOptions,
    pub entry: Option<String>,
    pub quiesce: Duration,
    pub broadcast_debounce: Duration,
    pub heartbeat: Duration,
    pub presence_window: Duration,
}

impl SessionOptions {
    pub fn from_config(config: &SketchConfig) -> Self {
        Self {
            collaborator: config.collab.collaborator_id(),
            renderer: config.preview.renderer_options(),
            entry: config.preview.entry.clone(),
            quiesce: config.collab.quiesce(),
            broadcast_debounce: config.collab.broadcast_debounce(),
            heartbeat: config.collab.heartbeat(),
            presence_window: config.collab.presence_window(),
        }
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from_config(&SketchConfig::default())
    }
}

pub struct EditorSession<S: Surface> {
    project: Project,
    /// Replaces the in-memory project as the preview's document source.
    source: Option<Box<dyn DocumentSource>>,
    renderer: PreviewRenderer<S>,
    interactions: Receiver<InteractEvent>,
    editor: Option<Box<dyn EditorSurface>>,
    reconciler: RemoteReconciler,
    debouncer: BroadcastDebouncer,
    roster: PresenceRoster,
    heartbeat: Duration,
    heartbeat_timer: Option<TimerId>,
    timers: TimerQueue,
    clock: Arc<dyn Clock>,
    backend: Backend,
    inbox: Option<Receiver<ChannelMessage>>,
    live: bool,
}

/// Split borrow: the preview source lives next to the renderer.
fn document_source<'a>(
    source: &'a Option<Box<dyn DocumentSource>>,
    project: &'a Project,
) -> &'a dyn DocumentSource {
    match source {
        Some(source) => source.as_ref(),
        None => project,
    }
}

impl<S: Surface> EditorSession<S> {
    pub fn new(
        project: Project,
        surface: S,
        backend: Backend,
        clock: Arc<dyn Clock>,
        options: SessionOptions,
    ) -> Self {
        let (tx, interactions) = unbounded();
        let renderer = PreviewRenderer::new(surface, NavigationInterceptor::new(tx), options.renderer)
            .with_entry(options.entry);
        let me = options.collaborator;

        Self {
            project,
            source: None,
            renderer,
            interactions,
            editor: None,
            reconciler: RemoteReconciler::new(me.clone(), options.quiesce),
            debouncer: BroadcastDebouncer::new(me.clone(), options.broadcast_debounce),
            roster: PresenceRoster::new(me, options.presence_window),
            heartbeat: options.heartbeat,
            heartbeat_timer: None,
            timers: TimerQueue::new(),
            clock,
            backend,
            inbox: None,
            live: false,
        }
    }

    /// Render from `source` instead of the in-memory project.
    pub fn with_source(mut self, source: Box<dyn DocumentSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Attach the live editing surface showing the active file.
    pub fn attach_editor(&mut self, editor: Box<dyn EditorSurface>) {
        self.editor = Some(editor);
    }

    // ------------------------------------------------------------------------
    // lifecycle
    // ------------------------------------------------------------------------

    /// Join the project channel, render the preview and start the heartbeat.
    pub fn mount(&mut self) -> bool {
        if self.live || self.renderer.state() == RenderState::Unmounted {
            return false;
        }
        let now = self.clock.now();

        self.inbox = Some(self.backend.channel.subscribe(&self.project.id));
        let source = document_source(&self.source, &self.project);
        self.renderer.mount(source, now, &mut self.timers);
        self.live = true;

        self.announce();
        self.arm_heartbeat(now);
        crate::debug!("collab"; "{} joined {}", self.me(), self.project.id);
        true
    }

    /// Cancel every timer, leave the channel and release the surface.
    pub fn unmount(&mut self) {
        if !self.live {
            return;
        }
        self.publish(ChannelMessage::Leave(self.me().clone()));

        self.renderer.unmount(&mut self.timers);
        self.debouncer.cancel_all(&mut self.timers);
        self.reconciler.cancel(&mut self.timers);
        self.heartbeat_timer = None;
        self.timers.clear();

        self.inbox = None;
        self.live = false;
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    // ------------------------------------------------------------------------
    // local editing
    // ------------------------------------------------------------------------

    /// A local edit of `id`. Returns `false` if the file does not exist.
    ///
    /// Edits made while a remote change is being applied update the model
    /// but are not broadcast.
    pub fn edit(&mut self, id: &FileId, content: impl Into<String>) -> bool {
        let content = content.into();
        if !self.project.update_file_content(id, content.as_str()) {
            return false;
        }
        if !self.live {
            return true;
        }

        let now = self.clock.now();
        if self.reconciler.is_external_change(now) {
            crate::debug!("collab"; "not broadcasting edit during quiesce window");
            return true;
        }
        self.debouncer.push(id, content, now, &mut self.timers);
        true
    }

    pub fn add_file(&mut self, name: &str, kind: Option<FileKind>) -> Result<&ProjectFile, FileSetError> {
        let id = self.project.add_file(name, kind)?.id.clone();
        self.announce();
        self.project.file(&id).ok_or(FileSetError::NotFound(id))
    }

    pub fn remove_file(&mut self, id: &FileId) -> Result<ProjectFile, FileSetError> {
        let removed = self.project.remove_file(id)?;
        self.debouncer.discard(id, &mut self.timers);
        self.announce();
        Ok(removed)
    }

    /// Focus another file in the editor.
    pub fn set_active_file(&mut self, id: &FileId) -> Result<(), FileSetError> {
        self.project.set_active(id)?;
        self.announce();
        Ok(())
    }

    // ------------------------------------------------------------------------
    // preview
    // ------------------------------------------------------------------------

    /// Recompose the preview with `name` as the entry file.
    pub fn on_entry_navigate(&mut self, name: &str) -> bool {
        let now = self.clock.now();
        let source = document_source(&self.source, &self.project);
        self.renderer.navigate(name, source, now)
    }

    /// Manual preview refresh.
    pub fn refresh(&mut self) -> bool {
        let now = self.clock.now();
        let source = document_source(&self.source, &self.project);
        self.renderer.refresh(source, now)
    }

    pub fn set_auto_refresh(&mut self, enabled: bool) {
        let now = self.clock.now();
        self.renderer.set_auto_refresh(enabled, now, &mut self.timers);
    }

    /// React to one click in the surface.
    pub fn handle_interaction(&mut self, event: &InteractEvent) -> Interception {
        let decision = NavigationInterceptor::decide(event);
        if let Interception::Navigate(name) = &decision {
            crate::debug!("preview"; "navigate to {}", name);
            self.on_entry_navigate(name);
        }
        decision
    }

    /// Handle every pending surface click. Returns how many were handled.
    pub fn drain_interactions(&mut self) -> usize {
        let events: Vec<_> = self.interactions.try_iter().collect();
        for event in &events {
            self.handle_interaction(event);
        }
        events.len()
    }

    // ------------------------------------------------------------------------
    // collaboration
    // ------------------------------------------------------------------------

    /// Apply a collaborator's change.
    ///
    /// Pending local broadcasts of overwritten files are dropped, so the
    /// remote content stays the last write on both sides.
    pub fn on_remote_change(&mut self, event: &CollaboratorChangeEvent) -> ReconcileOutcome {
        let now = self.clock.now();
        let editor = self
            .editor
            .as_mut()
            .map(|editor| editor.as_mut() as &mut dyn EditorSurface);
        let outcome = self
            .reconciler
            .reconcile(event, &mut self.project, editor, now, &mut self.timers);

        for id in outcome.active.iter().chain(&outcome.background) {
            if self.debouncer.is_pending(id) {
                crate::debug!("collab"; "dropping pending broadcast of {} overwritten by {}", id, event.originator);
                self.debouncer.discard(id, &mut self.timers);
            }
        }
        outcome
    }

    /// Handle every pending channel message. Returns how many were handled.
    pub fn drain_channel(&mut self) -> usize {
        let Some(inbox) = &self.inbox else {
            return 0;
        };
        let messages: Vec<_> = inbox.try_iter().collect();

        for message in &messages {
            match message {
                ChannelMessage::FileChange(event) => {
                    self.on_remote_change(event);
                }
                ChannelMessage::Presence(beat) => {
                    self.roster.record(beat);
                }
                ChannelMessage::Leave(id) => {
                    self.roster.remove(id);
                }
            }
        }
        messages.len()
    }

    /// Collaborators seen within the presence window.
    pub fn collaborators(&self) -> Vec<Collaborator> {
        self.roster.present(chrono::Utc::now().timestamp_millis())
    }

    // ------------------------------------------------------------------------
    // timers
    // ------------------------------------------------------------------------

    /// Run every timer that is due. Returns how many fired.
    pub fn fire_due_timers(&mut self) -> usize {
        let now = self.clock.now();
        let due = self.timers.pop_due(now);

        for (id, kind) in &due {
            match kind {
                TimerKind::PreviewRefresh => {
                    let source = document_source(&self.source, &self.project);
                    self.renderer.on_tick(source, now, &mut self.timers);
                }
                TimerKind::BroadcastFlush(file_id) => {
                    if let Some(event) = self.debouncer.flush(file_id)
                        && self.project.file(file_id).is_some()
                    {
                        self.publish(ChannelMessage::FileChange(event));
                    }
                }
                TimerKind::QuiesceEnd => self.reconciler.on_quiesce_end(*id),
                TimerKind::PresenceHeartbeat => {
                    self.heartbeat_timer = None;
                    self.roster.prune(chrono::Utc::now().timestamp_millis());
                    self.announce();
                    self.arm_heartbeat(now);
                }
            }
        }
        due.len()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Time until the next timer, if any.
    pub fn sleep_duration(&self) -> Option<Duration> {
        self.timers.sleep_duration(self.clock.now())
    }

    // ------------------------------------------------------------------------
    // persistence
    // ------------------------------------------------------------------------

    /// Save the project. Local state is unchanged on failure.
    pub fn save(&mut self) -> Result<(), BackendError> {
        if self.project.owner.is_none() {
            self.project.owner = Some(self.me().to_string());
        }
        self.backend.store.save(&self.project)
    }

    /// Replace the project with the stored copy.
    pub fn reload(&mut self) -> Result<bool, BackendError> {
        let result = self.backend.store.load(&self.project.id);
        self.on_loaded(result)
    }

    /// Apply a loaded project, unless the session has since been torn down.
    pub fn on_loaded(&mut self, result: Result<Project, BackendError>) -> Result<bool, BackendError> {
        let project = result?;
        if !self.live {
            crate::debug!("collab"; "dropping project loaded after unmount");
            return Ok(false);
        }
        let active = self.project.active_id().clone();
        self.project = project;
        // Keep the editor focus if the file survived.
        let _ = self.project.set_active(&active);
        Ok(true)
    }

    // ------------------------------------------------------------------------
    // accessors
    // ------------------------------------------------------------------------

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn renderer(&self) -> &PreviewRenderer<S> {
        &self.renderer
    }

    pub fn editor(&self) -> Option<&dyn EditorSurface> {
        self.editor.as_deref()
    }

    pub fn me(&self) -> &CollaboratorId {
        self.reconciler.me()
    }

    pub fn is_external_change(&self) -> bool {
        self.reconciler.is_external_change(self.clock.now())
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    // ------------------------------------------------------------------------
    // internals
    // ------------------------------------------------------------------------

    fn publish(&self, message: ChannelMessage) {
        if let Err(e) = self.backend.channel.publish(&self.project.id, message) {
            crate::log!("collab"; "{}", e);
        }
    }

    /// Tell collaborators which file we are on.
    fn announce(&self) {
        if !self.live {
            return;
        }
        let beat = self.roster.beat(
            Some(self.project.active_id().clone()),
            chrono::Utc::now().timestamp_millis(),
        );
        self.publish(ChannelMessage::Presence(beat));
    }

    fn arm_heartbeat(&mut self, now: Duration) {
        if let Some(id) = self.heartbeat_timer.take() {
            self.timers.cancel(id);
        }
        self.heartbeat_timer = Some(self.timers.schedule(now + self.heartbeat, TimerKind::PresenceHeartbeat));
    }
}

#[cfg(test)]
mod tests;
