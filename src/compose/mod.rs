//! Document composer.
//!
//! Turns a project's file set into one self-contained HTML document:
//!
//! ```text
//! files ──select_entry──▶ entry markup ──inject_styles──▶ ──inject_scripts──▶ document
//!                  └─ none ─▶ fallback skeleton ─┘
//! ```
//!
//! Composition is total and deterministic: the same files and requested entry
//! always produce byte-identical output, and a set without markup still
//! yields a well-formed document.

mod entry;
mod inject;
mod thumbnail;

pub use entry::{DEFAULT_ENTRY, select_entry};
pub use inject::{CSS_MARKER, JS_MARKER, Placement, inject_scripts, inject_styles, script_block, style_block};
pub use thumbnail::{CardLabel, ThumbnailOptions, compose_project_thumbnail, compose_thumbnail_with};

use crate::embed::compose::FALLBACK_HTML;
use crate::project::ProjectFile;

/// Compose the interactive preview document.
///
/// `requested_entry` selects a markup file by exact name; see
/// [`select_entry`] for the fallback order.
pub fn compose(files: &[ProjectFile], requested_entry: Option<&str>) -> String {
    let mut html = match select_entry(files, requested_entry) {
        Some(entry) => entry.content.clone(),
        None => FALLBACK_HTML.render(&()),
    };

    if let Some(block) = style_block(files) {
        let (out, placement) = inject_styles(&html, &block);
        crate::debug!("compose"; "styles placed by {:?}", placement);
        html = out;
    }

    if let Some(block) = script_block(files) {
        let (out, placement) = inject_scripts(&html, &block);
        crate::debug!("compose"; "scripts placed by {:?}", placement);
        html = out;
    }

    html
}

/// Compose the thumbnail document with default options.
pub fn compose_thumbnail(files: &[ProjectFile]) -> String {
    compose_thumbnail_with(files, &ThumbnailOptions::default())
}
