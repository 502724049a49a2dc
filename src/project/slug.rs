//! Project name slugs for share URLs and export file names.

use std::sync::LazyLock;

use regex::Regex;

static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9\s-]").unwrap());
static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s-]+").unwrap());

/// URL-friendly slug: Unicode → ASCII, lowercase, single dashes, no edge dashes.
///
/// ```ignore
/// assert_eq!(project_slug("My Cool  Project!"), "my-cool-project");
/// assert_eq!(project_slug("Café Menü"), "cafe-menu");
/// ```
pub fn project_slug(name: &str) -> String {
    let ascii = deunicode::deunicode(name).to_lowercase();
    let cleaned = DISALLOWED.replace_all(&ascii, "");
    let dashed = SEPARATORS.replace_all(cleaned.trim(), "-");
    dashed.trim_matches('-').to_string()
}

/// File-name-safe stem: every non-alphanumeric ASCII character becomes `_`.
pub fn archive_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
