//! Preview-safe composition for non-interactive thumbnails.
//!
//! Differences from [`compose`](super::compose):
//! - no requested entry (index.html → first markup → card)
//! - scripts never run: script files are replaced by a comment naming them,
//!   inline `<script>` elements are removed, and a CSP forbids the rest
//! - an override block disables interaction and scales the body down

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::entry::select_entry;
use super::inject::{inject_head_override, inject_scripts, inject_styles, style_block};
use crate::embed::compose::{CardVars, THUMBNAIL_CARD_HTML, THUMBNAIL_OVERRIDE_CSS, ThumbnailVars};
use crate::project::{FileKind, Project, ProjectFile};

/// A `<script>` element, or an unterminated one running to the end of input.
static INLINE_SCRIPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?(?:</script\s*>|\z)").unwrap());

const SCRIPT_REMOVED: &str = "<!-- inline script removed -->";

/// Thumbnail rendering options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailOptions {
    /// Body scale factor, in (0, 1].
    pub scale: f32,
}

impl Default for ThumbnailOptions {
    fn default() -> Self {
        Self { scale: 0.75 }
    }
}

/// Project details shown on the card of a project without markup.
#[derive(Debug, Clone, Copy)]
pub struct CardLabel<'a> {
    pub name: &'a str,
    pub description: &'a str,
}

/// Compose an inert, scaled-down document for card previews.
pub fn compose_thumbnail_with(files: &[ProjectFile], options: &ThumbnailOptions) -> String {
    compose_inert(files, None, options)
}

/// Like [`compose_thumbnail_with`], with the project's name and description
/// on the fallback card.
pub fn compose_project_thumbnail(project: &Project, options: &ThumbnailOptions) -> String {
    let label = CardLabel {
        name: &project.name,
        description: &project.description,
    };
    compose_inert(project.files(), Some(label), options)
}

fn compose_inert(files: &[ProjectFile], label: Option<CardLabel<'_>>, options: &ThumbnailOptions) -> String {
    let mut html = match select_entry(files, None) {
        Some(entry) => strip_inline_scripts(&entry.content),
        None => THUMBNAIL_CARD_HTML.render(&CardVars {
            name: label.map_or("No HTML file yet", |l| l.name).to_string(),
            description: label.map(|l| l.description.to_string()).unwrap_or_default(),
            summary: file_summary(files),
        }),
    };

    if let Some(block) = style_block(files) {
        html = inject_styles(&html, &block).0;
    }

    if let Some(comment) = script_comment(files) {
        html = inject_scripts(&html, &comment).0;
    }

    let overrides = THUMBNAIL_OVERRIDE_CSS.render(&ThumbnailVars {
        scale: options.scale,
    });
    inject_head_override(&html, &overrides)
}

fn strip_inline_scripts(html: &str) -> String {
    INLINE_SCRIPT.replace_all(html, SCRIPT_REMOVED).into_owned()
}

/// `<!-- JavaScript files: a.js, b.js -->`, or `None` without scripts.
fn script_comment(files: &[ProjectFile]) -> Option<String> {
    let names: Vec<&str> = files
        .iter()
        .filter(|f| f.kind == FileKind::Script)
        .map(|f| f.name.as_str())
        .collect();
    (!names.is_empty()).then(|| format!("<!-- JavaScript files: {} -->", names.join(", ")))
}

/// `3 files: CSS, JS, JS`
fn file_summary(files: &[ProjectFile]) -> String {
    let kinds: Vec<String> = files
        .iter()
        .map(|f| f.kind.label().to_ascii_uppercase())
        .collect();
    let noun = if files.len() == 1 { "file" } else { "files" };
    format!("{} {noun}: {}", files.len(), kinds.join(", "))
}
