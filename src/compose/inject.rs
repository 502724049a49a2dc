//! Style and script block injection.
//!
//! Placement is two-tier with a synthesis fallback:
//!
//! | Block  | 1st: marker comment | 2nd: structural tag       | 3rd: fallback              |
//! |--------|---------------------|---------------------------|----------------------------|
//! | style  | `CSS_MARKER`        | before first `</head>`    | new `<head>` at the start  |
//! | script | `JS_MARKER`         | before last `</body>`     | appended at the end        |
//!
//! Only the first marker occurrence is replaced. Tag matching is ASCII
//! case-insensitive.

use crate::project::{FileKind, ProjectFile};

/// Replaced by the aggregated style block.
pub const CSS_MARKER: &str = "<!-- CSS files will be injected here -->";
/// Replaced by the aggregated script block.
pub const JS_MARKER: &str = "<!-- JS files will be injected here -->";

const HEAD_CLOSE: &str = "</head>";
const BODY_CLOSE: &str = "</body>";

/// Where a block ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Replaced the placeholder comment.
    Marker,
    /// Inserted before `</head>` / `</body>`.
    Structural,
    /// Head synthesized (styles) or appended at the end (scripts).
    Fallback,
}

/// One `<style>` element holding every style file, in sequence order.
///
/// `None` when the set has no style files.
pub fn style_block(files: &[ProjectFile]) -> Option<String> {
    aggregate(files, FileKind::Style)
        .map(|css| format!(r#"<style data-websketch="styles">{css}</style>"#))
}

/// One `<script>` element holding every script file, in sequence order.
///
/// `None` when the set has no script files.
pub fn script_block(files: &[ProjectFile]) -> Option<String> {
    aggregate(files, FileKind::Script)
        .map(|js| format!(r#"<script data-websketch="scripts">{js}</script>"#))
}

fn aggregate(files: &[ProjectFile], kind: FileKind) -> Option<String> {
    let parts: Vec<&str> = files
        .iter()
        .filter(|f| f.kind == kind)
        .map(|f| f.content.as_str())
        .collect();
    (!parts.is_empty()).then(|| parts.join("\n"))
}

/// Place a style block into `html`.
pub fn inject_styles(html: &str, block: &str) -> (String, Placement) {
    if html.contains(CSS_MARKER) {
        return (html.replacen(CSS_MARKER, block, 1), Placement::Marker);
    }
    if let Some(pos) = find_ignore_case(html, HEAD_CLOSE) {
        return (splice(html, pos, block), Placement::Structural);
    }
    (format!("<head>{block}</head>{html}"), Placement::Fallback)
}

/// Place a script block (or any body-level fragment) into `html`.
pub fn inject_scripts(html: &str, block: &str) -> (String, Placement) {
    if html.contains(JS_MARKER) {
        return (html.replacen(JS_MARKER, block, 1), Placement::Marker);
    }
    if let Some(pos) = rfind_ignore_case(html, BODY_CLOSE) {
        return (splice(html, pos, block), Placement::Structural);
    }
    (format!("{html}\n{block}"), Placement::Fallback)
}

/// Insert an override block before `</head>`, or inside a new head at the start.
///
/// Markers are deliberately not considered: overrides must come after
/// every user style.
pub fn inject_head_override(html: &str, block: &str) -> String {
    match find_ignore_case(html, HEAD_CLOSE) {
        Some(pos) => splice(html, pos, block),
        None => format!("<head>{block}</head>{html}"),
    }
}

fn splice(html: &str, pos: usize, block: &str) -> String {
    let mut out = String::with_capacity(html.len() + block.len());
    out.push_str(&html[..pos]);
    out.push_str(block);
    out.push_str(&html[pos..]);
    out
}

/// Byte offset of the first ASCII case-insensitive match of `needle`.
///
/// `needle` must be ASCII, so every match starts on a char boundary.
fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle.as_bytes()))
}

/// Byte offset of the last ASCII case-insensitive match of `needle`.
fn rfind_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .as_bytes()
        .windows(needle.len())
        .rposition(|w| w.eq_ignore_ascii_case(needle.as_bytes()))
}
