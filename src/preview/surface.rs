//! Rendering surface abstraction.
//!
//! A surface is the isolated area a composed document is rendered into. The
//! renderer only ever replaces its whole content; interaction flows back as
//! [`InteractEvent`]s sent to whichever sinks are attached.

use crossbeam::channel::Sender;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where a surface delivers interaction events.
pub type InteractSink = Sender<InteractEvent>;

/// One element on the path of a click, innermost first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTarget {
    /// Lowercase tag name (`a`, `span`, ...).
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl EventTarget {
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            href: None,
        }
    }

    pub fn link(href: impl Into<String>) -> Self {
        Self {
            tag: "a".into(),
            href: Some(href.into()),
        }
    }
}

/// A click inside the surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractEvent {
    /// URL of the document shown in the surface when the click happened.
    pub document_url: String,
    /// Event path, innermost element first.
    pub path: Vec<EventTarget>,
}

impl InteractEvent {
    /// Click directly on a link.
    pub fn link_click(document_url: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            document_url: document_url.into(),
            path: vec![EventTarget::link(href)],
        }
    }

    /// `href` of the nearest enclosing link, if any.
    pub fn nearest_link(&self) -> Option<&str> {
        self.path
            .iter()
            .find(|t| t.tag.eq_ignore_ascii_case("a") && t.href.is_some())
            .and_then(|t| t.href.as_deref())
    }
}

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("surface is detached")]
    Detached,
    #[error("surface has been disposed")]
    Disposed,
    #[error("surface write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// An isolated rendering target.
pub trait Surface {
    /// Replace the entire content. Drops every attached interaction sink.
    fn write(&mut self, html: &str) -> Result<(), SurfaceError>;

    /// Attach a sink for clicks on the current content.
    fn on_interact(&mut self, sink: InteractSink);

    /// Release the surface. Later writes fail with [`SurfaceError::Disposed`].
    fn dispose(&mut self);
}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn write(&mut self, html: &str) -> Result<(), SurfaceError> {
        (**self).write(html)
    }

    fn on_interact(&mut self, sink: InteractSink) {
        (**self).on_interact(sink);
    }

    fn dispose(&mut self) {
        (**self).dispose();
    }
}

/// Surface kept in memory, for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemorySurface {
    document: Option<String>,
    sinks: Vec<InteractSink>,
    writes: usize,
    detached: bool,
    disposed: bool,
}

#[cfg(test)]
impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Make subsequent writes fail until reattached.
    pub fn set_detached(&mut self, detached: bool) {
        self.detached = detached;
    }

    /// Deliver a click to every attached sink; returns how many received it.
    pub fn click(&self, event: &InteractEvent) -> usize {
        self.sinks
            .iter()
            .filter(|sink| sink.send(event.clone()).is_ok())
            .count()
    }
}

#[cfg(test)]
impl Surface for MemorySurface {
    fn write(&mut self, html: &str) -> Result<(), SurfaceError> {
        if self.disposed {
            return Err(SurfaceError::Disposed);
        }
        if self.detached {
            return Err(SurfaceError::Detached);
        }
        self.sinks.clear();
        self.document = Some(html.to_string());
        self.writes += 1;
        Ok(())
    }

    fn on_interact(&mut self, sink: InteractSink) {
        if !self.disposed {
            self.sinks.push(sink);
        }
    }

    fn dispose(&mut self) {
        self.disposed = true;
        self.sinks.clear();
    }
}
