//! Navigation interceptor.
//!
//! Link clicks inside the surface must not leave the sketch: a same-origin
//! link is turned into a request to recompose with the linked file as entry.
//! Cross-origin links are left to the browser.

use percent_encoding::percent_decode_str;
use url::Url;

use super::surface::{InteractEvent, InteractSink, Surface};

/// What to do with a click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interception {
    /// Prevent navigation and recompose with this entry file.
    Navigate(String),
    /// Same-origin link without a file name: prevent navigation, do nothing.
    Prevented,
    /// Cross-origin link or in-page anchor: let the browser handle it.
    PassThrough,
    /// Not a link click.
    Ignored,
}

impl Interception {
    /// Whether the surface must cancel the default navigation.
    pub fn prevents_default(&self) -> bool {
        matches!(self, Self::Navigate(_) | Self::Prevented)
    }
}

/// Attaches a click listener to the surface after every write.
#[derive(Debug, Clone)]
pub struct NavigationInterceptor {
    sink: InteractSink,
}

impl NavigationInterceptor {
    pub fn new(sink: InteractSink) -> Self {
        Self { sink }
    }

    /// Attach to the surface's current content.
    ///
    /// A full content replace drops listeners, so this runs after each write.
    pub fn attach<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.on_interact(self.sink.clone());
    }

    /// Decide what a click means.
    pub fn decide(event: &InteractEvent) -> Interception {
        let Some(href) = event.nearest_link() else {
            return Interception::Ignored;
        };
        let Ok(base) = Url::parse(&event.document_url) else {
            return Interception::Ignored;
        };
        let Ok(target) = base.join(href) else {
            return Interception::Ignored;
        };

        if !same_origin(&base, &target) {
            return Interception::PassThrough;
        }
        if is_same_document(&base, &target) {
            return Interception::PassThrough;
        }

        match last_segment(&target) {
            Some(name) => Interception::Navigate(name),
            None => Interception::Prevented,
        }
    }
}

/// `file:` URLs have opaque origins that never compare equal.
fn same_origin(a: &Url, b: &Url) -> bool {
    if a.scheme() == "file" && b.scheme() == "file" {
        return true;
    }
    a.origin() == b.origin()
}

/// `#anchor` links only scroll the current document.
fn is_same_document(base: &Url, target: &Url) -> bool {
    target.fragment().is_some() && base[..url::Position::AfterQuery] == target[..url::Position::AfterQuery]
}

/// Final path segment, percent-decoded; `None` if empty.
fn last_segment(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.next_back()?;
    let name = percent_decode_str(segment).decode_utf8_lossy();
    (!name.is_empty()).then(|| name.into_owned())
}
