//! Surface backed by the HTTP preview page.
//!
//! The session writes documents here; request handlers read them. The
//! browser iframe polls the version and reloads when it changes.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::Serialize;

use crate::preview::{InteractEvent, InteractSink, Surface, SurfaceError};

/// What the version endpoint reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceStatus {
    /// Fingerprint of the current document, empty before the first write.
    pub version: String,
    pub entry: Option<String>,
    pub auto_refresh: bool,
}

#[derive(Default)]
struct Snapshot {
    document: Option<Arc<str>>,
    status: SurfaceStatus,
    disposed: bool,
}

/// State shared between the session loop and request handlers.
#[derive(Default)]
pub struct SurfaceState {
    snapshot: RwLock<Snapshot>,
    sink: Mutex<Option<InteractSink>>,
}

impl SurfaceState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Latest written document.
    pub fn document(&self) -> Option<Arc<str>> {
        self.snapshot.read().document.clone()
    }

    pub fn status(&self) -> SurfaceStatus {
        self.snapshot.read().status.clone()
    }

    pub fn version(&self) -> String {
        self.snapshot.read().status.version.clone()
    }

    /// Mirror renderer settings into the version endpoint.
    pub fn set_view(&self, entry: Option<&str>, auto_refresh: bool) {
        let mut snapshot = self.snapshot.write();
        snapshot.status.entry = entry.map(str::to_string);
        snapshot.status.auto_refresh = auto_refresh;
    }

    /// Hand a click from the browser to the attached listener.
    ///
    /// Returns `false` when nothing listens (document replaced or disposed).
    pub fn deliver(&self, event: InteractEvent) -> bool {
        let sink = self.sink.lock();
        sink.as_ref().is_some_and(|tx| tx.send(event).is_ok())
    }
}

/// Short content fingerprint.
pub fn fingerprint(html: &str) -> String {
    let hash = blake3::hash(html.as_bytes());
    hex::encode(&hash.as_bytes()[..8])
}

pub struct HttpSurface {
    state: Arc<SurfaceState>,
}

impl HttpSurface {
    pub fn new(state: Arc<SurfaceState>) -> Self {
        Self { state }
    }
}

impl Surface for HttpSurface {
    fn write(&mut self, html: &str) -> Result<(), SurfaceError> {
        let mut snapshot = self.state.snapshot.write();
        if snapshot.disposed {
            return Err(SurfaceError::Disposed);
        }
        // A reload drops the old page's listeners.
        self.state.sink.lock().take();

        let version = fingerprint(html);
        if snapshot.status.version != version {
            snapshot.document = Some(Arc::from(html));
            snapshot.status.version = version;
        }
        Ok(())
    }

    fn on_interact(&mut self, sink: InteractSink) {
        if !self.state.snapshot.read().disposed {
            *self.state.sink.lock() = Some(sink);
        }
    }

    fn dispose(&mut self) {
        self.state.snapshot.write().disposed = true;
        self.state.sink.lock().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam::channel::unbounded;

    const DOC: &str = "http://127.0.0.1:5280/__surface/document";

    #[test]
    fn test_write_updates_version_only_on_change() {
        let state = SurfaceState::new();
        let mut surface = HttpSurface::new(Arc::clone(&state));
        assert!(state.document().is_none());
        assert_eq!(state.version(), "");

        surface.write("<p>one</p>").unwrap();
        let first = state.version();
        assert_eq!(first.len(), 16);
        assert_eq!(state.document().as_deref(), Some("<p>one</p>"));

        surface.write("<p>one</p>").unwrap();
        assert_eq!(state.version(), first);

        surface.write("<p>two</p>").unwrap();
        assert_ne!(state.version(), first);
    }

    #[test]
    fn test_write_detaches_listener() {
        let state = SurfaceState::new();
        let mut surface = HttpSurface::new(Arc::clone(&state));
        let (tx, rx) = unbounded();

        surface.on_interact(tx);
        assert!(state.deliver(InteractEvent::link_click(DOC, "about.html")));
        assert_eq!(rx.try_iter().count(), 1);

        surface.write("<p>new</p>").unwrap();
        assert!(!state.deliver(InteractEvent::link_click(DOC, "about.html")));
    }

    #[test]
    fn test_dispose() {
        let state = SurfaceState::new();
        let mut surface = HttpSurface::new(Arc::clone(&state));
        let (tx, _rx) = unbounded();
        surface.on_interact(tx);
        surface.dispose();

        assert!(matches!(surface.write("x"), Err(SurfaceError::Disposed)));
        assert!(!state.deliver(InteractEvent::link_click(DOC, "a.html")));
    }

    #[test]
    fn test_status_serializes_camel_case() {
        let state = SurfaceState::new();
        state.set_view(Some("about.html"), false);
        let json = serde_json::to_string(&state.status()).unwrap();
        assert_eq!(json, r#"{"version":"","entry":"about.html","autoRefresh":false}"#);
    }
}
