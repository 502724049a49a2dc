//! Entry file selection.

use crate::project::ProjectFile;

/// Name preferred as entry when nothing else is requested (ASCII case-insensitive).
pub const DEFAULT_ENTRY: &str = "index.html";

/// Pick the markup file that roots the composed document.
///
/// Order:
/// 1. markup file named exactly `requested`
/// 2. markup file named `index.html` (case-insensitive)
/// 3. first markup file in sequence order
///
/// Returns `None` when the set holds no markup at all.
pub fn select_entry<'a>(files: &'a [ProjectFile], requested: Option<&str>) -> Option<&'a ProjectFile> {
    let mut markup = files.iter().filter(|f| f.is_markup());

    if let Some(name) = requested
        && let Some(file) = markup.clone().find(|f| f.name == name)
    {
        return Some(file);
    }

    markup
        .clone()
        .find(|f| f.name.eq_ignore_ascii_case(DEFAULT_ENTRY))
        .or_else(|| markup.next())
}
