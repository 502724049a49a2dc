//! Embedded static resources.
//!
//! # Module Structure
//!
//! - `template` - Template types for typed variable injection
//! - `compose` - Documents synthesized by the composer (fallback, thumbnail card/override)
//! - `preview` - Renderer documents (inline error panel)
//! - `serve` - Live preview server pages (shell page + client script)
//!
//! # Usage
//!
//! ```ignore
//! use embed::compose::{THUMBNAIL_OVERRIDE_CSS, ThumbnailVars};
//!
//! let css = THUMBNAIL_OVERRIDE_CSS.render(&ThumbnailVars { scale: 0.75 });
//! ```

mod template;

use std::borrow::Cow;

pub use template::{Template, TemplateVars};

/// Escape HTML special characters in text content.
///
/// Uses `Cow` to avoid allocation when no escaping is needed.
pub fn escape_html(s: &str) -> Cow<'_, str> {
    if !s.contains(['<', '>', '&', '"', '\'']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

pub mod compose {
    use super::{Template, TemplateVars};

    /// Document used when a project has no markup file.
    ///
    /// Carries both placeholder markers so styles and scripts land in the
    /// usual places.
    pub const FALLBACK_HTML: Template<()> = Template::new(include_str!("compose/fallback.html"));

    /// Variables for the thumbnail fallback card.
    pub struct CardVars {
        pub name: String,
        /// Omitted from the card when empty.
        pub description: String,
        /// e.g. `3 files: CSS, JS, JS`
        pub summary: String,
    }

    impl TemplateVars for CardVars {
        fn apply(&self, content: &str) -> String {
            let description = if self.description.trim().is_empty() {
                String::new()
            } else {
                format!(
                    r#"<p class="description">{}</p>"#,
                    super::escape_html(&self.description)
                )
            };
            content
                .replace("__PROJECT_NAME__", &super::escape_html(&self.name))
                .replace("__DESCRIPTION__", &description)
                .replace("__FILE_SUMMARY__", &super::escape_html(&self.summary))
        }
    }

    /// Thumbnail document used when a project has no markup file.
    pub const THUMBNAIL_CARD_HTML: Template<CardVars> =
        Template::new(include_str!("compose/thumbnail-card.html"));

    /// Variables for the thumbnail override stylesheet.
    pub struct ThumbnailVars {
        pub scale: f32,
    }

    impl TemplateVars for ThumbnailVars {
        fn apply(&self, content: &str) -> String {
            // Body is scaled down, so it must be proportionally larger to fill the viewport.
            let inverse = 100.0 / self.scale;
            content
                .replace("__SCALE__", &format!("{}", self.scale))
                .replace("__INVERSE_PERCENT__", &format!("{inverse:.2}%"))
        }
    }

    /// Override block that makes a document inert and fits it to a thumbnail.
    pub const THUMBNAIL_OVERRIDE_CSS: Template<ThumbnailVars> =
        Template::new(include_str!("compose/thumbnail-override.css"));
}

pub mod preview {
    use super::{Template, TemplateVars};

    /// Variables for the inline error panel.
    pub struct ErrorVars {
        pub message: String,
    }

    impl TemplateVars for ErrorVars {
        fn apply(&self, content: &str) -> String {
            content.replace("__MESSAGE__", &super::escape_html(&self.message))
        }
    }

    /// Shown inside the surface when a document could not be composed.
    pub const ERROR_PANEL_HTML: Template<ErrorVars> =
        Template::new(include_str!("preview/error-panel.html"));
}

pub mod serve {
    use super::{Template, TemplateVars};

    /// Variables for the live preview shell page.
    pub struct ShellVars {
        pub title: String,
        pub poll_ms: u64,
        pub auto_refresh: bool,
    }

    impl TemplateVars for ShellVars {
        fn apply(&self, content: &str) -> String {
            content
                .replace("__TITLE__", &super::escape_html(&self.title))
                .replace("__CLIENT_JS__", CLIENT_JS)
                .replace("__POLL_MS__", &self.poll_ms.to_string())
                .replace("__AUTO_REFRESH__", if self.auto_refresh { "true" } else { "false" })
        }
    }

    const CLIENT_JS: &str = include_str!("serve/client.js");

    /// Page hosting the sandboxed preview iframe and its toolbar.
    pub const SHELL_HTML: Template<ShellVars> =
        Template::new(include_str!("serve/shell.html"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("plain"), "plain");
        assert!(matches!(escape_html("plain"), Cow::Borrowed(_)));
        assert_eq!(escape_html("<a href=\"x\">&</a>"), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
    }

    #[test]
    fn test_thumbnail_vars() {
        let css = compose::THUMBNAIL_OVERRIDE_CSS.render(&compose::ThumbnailVars { scale: 0.5 });
        assert!(css.contains("scale(0.5)"));
        assert!(css.contains("200.00%"));
        assert!(!css.contains("__"));
    }

    #[test]
    fn test_card_vars() {
        let mut vars = compose::CardVars {
            name: "Tom & Jerry".into(),
            description: "".into(),
            summary: "1 file: CSS".into(),
        };
        let html = compose::THUMBNAIL_CARD_HTML.render(&vars);
        assert!(html.contains("<h2>Tom &amp; Jerry</h2>"));
        assert!(!html.contains("class=\"description\""));
        assert!(!html.contains("__"));

        vars.description = "<b>chase</b>".into();
        let html = compose::THUMBNAIL_CARD_HTML.render(&vars);
        assert!(html.contains(r#"<p class="description">&lt;b&gt;chase&lt;/b&gt;</p>"#));
    }

    #[test]
    fn test_shell_vars() {
        let html = serve::SHELL_HTML.render(&serve::ShellVars {
            title: "A & B".into(),
            poll_ms: 1000,
            auto_refresh: true,
        });
        assert!(html.contains("A &amp; B"));
        assert!(html.contains("1000"));
        assert!(!html.contains("__CLIENT_JS__"));
        assert!(!html.contains("__POLL_MS__"));
    }

    #[test]
    fn test_client_lets_in_page_anchors_scroll() {
        let html = serve::SHELL_HTML.render(&serve::ShellVars {
            title: String::new(),
            poll_ms: 500,
            auto_refresh: false,
        });
        let guard = html.find("if (sameDocument && link.href.includes(\"#\")) return;").unwrap();
        let prevent = html.find("event.preventDefault()").unwrap();
        assert!(guard < prevent);
    }

    #[test]
    fn test_error_panel_escapes() {
        let html = preview::ERROR_PANEL_HTML.render(&preview::ErrorVars {
            message: "<script>boom</script>".into(),
        });
        assert!(html.contains("&lt;script&gt;boom"));
    }
}
