//! Project file definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of project file, determines how it takes part in composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileKind {
    /// Markup file (.html, .htm) - candidate entry document
    #[serde(rename = "html")]
    Markup,
    /// Style file (.css) - aggregated into one style block
    #[serde(rename = "css")]
    Style,
    /// Script file (.js and anything unrecognized) - aggregated into one script block
    #[serde(rename = "js")]
    Script,
}

impl FileKind {
    /// Detect file kind from a file name.
    ///
    /// Unknown or missing extensions fall back to [`FileKind::Script`].
    pub fn from_name(name: &str) -> Self {
        let ext = name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or(name);
        match ext.to_ascii_lowercase().as_str() {
            "html" | "htm" => Self::Markup,
            "css" => Self::Style,
            _ => Self::Script,
        }
    }

    /// Short label used in manifests and listings.
    pub fn label(self) -> &'static str {
        match self {
            Self::Markup => "html",
            Self::Style => "css",
            Self::Script => "js",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Opaque file identifier, unique within a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(String);

impl FileId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FileId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for FileId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named source file owned by a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFile {
    pub id: FileId,
    /// Unique within the project, carries the extension.
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
    #[serde(default)]
    pub content: String,
}

impl ProjectFile {
    /// Create a file with a fresh id.
    pub fn new(name: impl Into<String>, kind: FileKind, content: impl Into<String>) -> Self {
        Self {
            id: FileId::generate(),
            name: name.into(),
            kind,
            content: content.into(),
        }
    }

    /// Create a file whose kind is derived from its name.
    pub fn named(name: impl Into<String>, content: impl Into<String>) -> Self {
        let name = name.into();
        let kind = FileKind::from_name(&name);
        Self::new(name, kind, content)
    }

    #[inline]
    pub fn is_markup(&self) -> bool {
        self.kind == FileKind::Markup
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_name() {
        assert_eq!(FileKind::from_name("index.html"), FileKind::Markup);
        assert_eq!(FileKind::from_name("old.htm"), FileKind::Markup);
        assert_eq!(FileKind::from_name("PAGE.HTML"), FileKind::Markup);
        assert_eq!(FileKind::from_name("styles.css"), FileKind::Style);
        assert_eq!(FileKind::from_name("app.js"), FileKind::Script);
    }

    #[test]
    fn test_kind_fallback_is_script() {
        assert_eq!(FileKind::from_name("data.json"), FileKind::Script);
        assert_eq!(FileKind::from_name("Makefile"), FileKind::Script);
        assert_eq!(FileKind::from_name("archive.tar.gz"), FileKind::Script);
        assert_eq!(FileKind::from_name(""), FileKind::Script);
    }

    #[test]
    fn test_kind_serde_labels() {
        let file = ProjectFile {
            id: FileId::from("f1"),
            name: "a.css".into(),
            kind: FileKind::Style,
            content: "body{}".into(),
        };
        let json = serde_json::to_string(&file).unwrap();
        assert!(json.contains("\"type\":\"css\""));

        let back: ProjectFile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, file);
    }

    #[test]
    fn test_named_derives_kind() {
        let file = ProjectFile::named("main.js", "console.log(1)");
        assert_eq!(file.kind, FileKind::Script);
        assert!(!file.is_markup());
    }
}
