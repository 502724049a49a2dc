//! Preview renderer state machine.
//!
//! ```text
//!  Idle ──mount──▶ Rendering ──▶ Displayed ◀──tick / refresh / navigate──┐
//!                      │             └──────────▶ Rendering ─────────────┘
//!                      └─ write failed: back to the previous state
//!  any ──unmount──▶ Unmounted (terminal)
//! ```
//!
//! Every commit replaces the whole surface content, after which the
//! navigation interceptor is attached again.

use std::time::Duration;

use thiserror::Error;

use super::navigate::NavigationInterceptor;
use super::surface::{Surface, SurfaceError};
use crate::compose::compose;
use crate::embed::preview::{ERROR_PANEL_HTML, ErrorVars};
use crate::project::Project;
use crate::schedule::{TimerId, TimerKind, TimerQueue};

/// A document could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct CompositionFailure(pub String);

/// Produces the document to display for a requested entry.
pub trait DocumentSource {
    fn document(&self, entry: Option<&str>) -> Result<String, CompositionFailure>;
}

impl DocumentSource for Project {
    fn document(&self, entry: Option<&str>) -> Result<String, CompositionFailure> {
        Ok(compose(self.files(), entry))
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("composition failed: {0}")]
    Composition(#[from] CompositionFailure),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    /// Nothing committed to the surface yet.
    Idle,
    /// Composing and writing.
    Rendering,
    /// The surface shows committed content.
    Displayed,
    /// Torn down; terminal.
    Unmounted,
}

/// Renderer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RendererOptions {
    pub auto_refresh: bool,
    pub refresh_interval: Duration,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            auto_refresh: true,
            refresh_interval: Duration::from_millis(1000),
        }
    }
}

/// Composes documents into a surface it exclusively owns.
pub struct PreviewRenderer<S: Surface> {
    surface: S,
    interceptor: NavigationInterceptor,
    state: RenderState,
    mounted: bool,
    auto_refresh: bool,
    interval: Duration,
    refresh_timer: Option<TimerId>,
    current_entry: Option<String>,
    last_update: Option<Duration>,
    writes: u64,
    last_error: Option<RenderError>,
}

impl<S: Surface> PreviewRenderer<S> {
    pub fn new(surface: S, interceptor: NavigationInterceptor, options: RendererOptions) -> Self {
        Self {
            surface,
            interceptor,
            state: RenderState::Idle,
            mounted: false,
            auto_refresh: options.auto_refresh,
            interval: options.refresh_interval,
            refresh_timer: None,
            current_entry: None,
            last_update: None,
            writes: 0,
            last_error: None,
        }
    }

    /// Set the entry requested before mounting.
    pub fn with_entry(mut self, entry: Option<String>) -> Self {
        self.current_entry = entry;
        self
    }

    // ------------------------------------------------------------------------
    // lifecycle
    // ------------------------------------------------------------------------

    /// Initial compose and write, then start auto-refresh if enabled.
    ///
    /// Returns `false` if already mounted or unmounted, or nothing was committed.
    pub fn mount(
        &mut self,
        source: &dyn DocumentSource,
        now: Duration,
        timers: &mut TimerQueue,
    ) -> bool {
        if self.mounted || self.state == RenderState::Unmounted {
            return false;
        }
        self.mounted = true;
        let committed = self.render(source, now);
        if self.auto_refresh {
            self.arm(now, timers);
        }
        committed
    }

    /// Manual refresh, regardless of the auto-refresh setting.
    pub fn refresh(&mut self, source: &dyn DocumentSource, now: Duration) -> bool {
        self.mounted && self.render(source, now)
    }

    /// The `PreviewRefresh` timer fired.
    pub fn on_tick(
        &mut self,
        source: &dyn DocumentSource,
        now: Duration,
        timers: &mut TimerQueue,
    ) -> bool {
        self.refresh_timer = None;
        if !self.mounted || !self.auto_refresh {
            return false;
        }
        let committed = self.render(source, now);
        self.arm(now, timers);
        committed
    }

    /// Turn periodic refresh on or off.
    pub fn set_auto_refresh(&mut self, enabled: bool, now: Duration, timers: &mut TimerQueue) {
        self.auto_refresh = enabled;
        if !enabled {
            self.disarm(timers);
        } else if self.mounted && self.refresh_timer.is_none() {
            self.arm(now, timers);
        }
    }

    /// Recompose with `entry` as the requested entry file.
    pub fn navigate(&mut self, entry: &str, source: &dyn DocumentSource, now: Duration) -> bool {
        if !self.mounted {
            return false;
        }
        self.current_entry = Some(entry.to_string());
        self.render(source, now)
    }

    /// Release the timer, listeners and the surface. Terminal.
    pub fn unmount(&mut self, timers: &mut TimerQueue) {
        if self.state == RenderState::Unmounted {
            return;
        }
        self.disarm(timers);
        self.surface.dispose();
        self.mounted = false;
        self.state = RenderState::Unmounted;
    }

    // ------------------------------------------------------------------------
    // accessors
    // ------------------------------------------------------------------------

    #[inline]
    pub fn state(&self) -> RenderState {
        self.state
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn auto_refresh(&self) -> bool {
        self.auto_refresh
    }

    pub fn current_entry(&self) -> Option<&str> {
        self.current_entry.as_deref()
    }

    /// Clock time of the last committed write.
    pub fn last_update(&self) -> Option<Duration> {
        self.last_update
    }

    pub fn writes(&self) -> u64 {
        self.writes
    }

    pub fn last_error(&self) -> Option<&RenderError> {
        self.last_error.as_ref()
    }

    pub fn refresh_timer(&self) -> Option<TimerId> {
        self.refresh_timer
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    // ------------------------------------------------------------------------
    // internals
    // ------------------------------------------------------------------------

    /// Compose and commit. Returns whether the composed document was shown.
    fn render(&mut self, source: &dyn DocumentSource, now: Duration) -> bool {
        let previous = self.state;
        self.state = RenderState::Rendering;

        let (html, failure) = match source.document(self.current_entry.as_deref()) {
            Ok(html) => (html, None),
            Err(failure) => {
                crate::log!("preview"; "cannot compose document: {}", failure);
                let panel = ERROR_PANEL_HTML.render(&ErrorVars {
                    message: failure.to_string(),
                });
                (panel, Some(failure))
            }
        };

        if let Err(e) = self.surface.write(&html) {
            crate::log!("preview"; "{}", e);
            self.state = previous;
            self.last_error = Some(RenderError::Surface(e));
            return false;
        }

        self.state = RenderState::Displayed;
        self.writes += 1;
        self.last_update = Some(now);
        self.interceptor.attach(&mut self.surface);

        match failure {
            Some(failure) => {
                self.last_error = Some(RenderError::Composition(failure));
                false
            }
            None => {
                self.last_error = None;
                true
            }
        }
    }

    fn arm(&mut self, now: Duration, timers: &mut TimerQueue) {
        self.disarm(timers);
        self.refresh_timer = Some(timers.schedule(now + self.interval, TimerKind::PreviewRefresh));
    }

    fn disarm(&mut self, timers: &mut TimerQueue) {
        if let Some(id) = self.refresh_timer.take() {
            timers.cancel(id);
        }
    }
}
