//! Live preview.
//!
//! - [`Surface`]: where documents are rendered (HTTP-served iframe, memory)
//! - [`PreviewRenderer`]: mount / refresh / auto-refresh / unmount lifecycle
//! - [`NavigationInterceptor`]: turns intra-project link clicks into entry changes

mod navigate;
mod renderer;
mod surface;

pub use navigate::{Interception, NavigationInterceptor};
pub use renderer::{
    CompositionFailure, DocumentSource, PreviewRenderer, RenderError, RenderState, RendererOptions,
};
pub use surface::{EventTarget, InteractEvent, InteractSink, Surface, SurfaceError};

#[cfg(test)]
pub use surface::MemorySurface;
