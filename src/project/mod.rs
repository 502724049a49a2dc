//! Project file set model.
//!
//! A [`Project`] exclusively owns an ordered sequence of [`ProjectFile`]s
//! (insertion order = tab order) and is the only place they are mutated.
//!
//! Invariants upheld by every operation:
//! - at least one file exists
//! - file names are unique within the project
//! - rejected operations leave the project unchanged

mod error;
mod file;
pub mod seed;
pub mod slug;

pub use error::FileSetError;
pub use file::{FileId, FileKind, ProjectFile};

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque project identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Single-file or multi-file project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectKind {
    #[serde(rename = "single")]
    Single,
    #[default]
    #[serde(rename = "multiple")]
    Multi,
}

impl ProjectKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Multi => "multiple",
        }
    }
}

/// A sketch project: metadata plus its file set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub kind: ProjectKind,
    files: Vec<ProjectFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub is_pinned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    /// Editor focus; not persisted. `None` means the first file.
    #[serde(skip)]
    active: Option<FileId>,
}

impl Project {
    /// Create a project seeded with the default file set for `kind`.
    pub fn new(name: impl Into<String>, description: impl Into<String>, kind: ProjectKind) -> Self {
        let now = Utc::now();
        Self {
            id: ProjectId::generate(),
            name: name.into(),
            description: description.into(),
            kind,
            files: seed::default_files(kind),
            owner: None,
            is_public: false,
            is_pinned: false,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            active: None,
        }
    }

    /// Create a project from an existing ordered file list.
    pub fn from_files(
        name: impl Into<String>,
        kind: ProjectKind,
        files: Vec<ProjectFile>,
    ) -> Result<Self, FileSetError> {
        let mut project = Self::new(name, "", kind);
        project.files = files;
        project.validate()?;
        Ok(project)
    }

    /// Check the file set invariants (used after deserialization).
    pub fn validate(&self) -> Result<(), FileSetError> {
        if self.files.is_empty() {
            return Err(FileSetError::LastFile);
        }
        for (i, file) in self.files.iter().enumerate() {
            if file.name.trim().is_empty() {
                return Err(FileSetError::InvalidName);
            }
            if self.files[..i].iter().any(|f| f.name == file.name) {
                return Err(FileSetError::DuplicateName(file.name.clone()));
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // queries
    // ------------------------------------------------------------------------

    #[inline]
    pub fn files(&self) -> &[ProjectFile] {
        &self.files
    }

    pub fn file(&self, id: &FileId) -> Option<&ProjectFile> {
        self.files.iter().find(|f| &f.id == id)
    }

    pub fn file_by_name(&self, name: &str) -> Option<&ProjectFile> {
        self.files.iter().find(|f| f.name == name)
    }

    /// The file currently focused in the editor.
    pub fn active_file(&self) -> &ProjectFile {
        self.active
            .as_ref()
            .and_then(|id| self.file(id))
            .unwrap_or(&self.files[0])
    }

    pub fn active_id(&self) -> &FileId {
        &self.active_file().id
    }

    // ------------------------------------------------------------------------
    // mutations
    // ------------------------------------------------------------------------

    /// Append a new empty file and make it active.
    ///
    /// `kind` defaults to the kind derived from the file name.
    pub fn add_file(
        &mut self,
        name: &str,
        kind: Option<FileKind>,
    ) -> Result<&ProjectFile, FileSetError> {
        if name.trim().is_empty() {
            return Err(FileSetError::InvalidName);
        }
        if self.file_by_name(name).is_some() {
            return Err(FileSetError::DuplicateName(name.to_string()));
        }

        let kind = kind.unwrap_or_else(|| FileKind::from_name(name));
        let file = ProjectFile::new(name, kind, "");
        self.active = Some(file.id.clone());
        self.files.push(file);
        self.touch();

        Ok(&self.files[self.files.len() - 1])
    }

    /// Remove a file. If it was active, the first remaining file becomes active.
    pub fn remove_file(&mut self, id: &FileId) -> Result<ProjectFile, FileSetError> {
        if self.files.len() <= 1 {
            return Err(FileSetError::LastFile);
        }
        let index = self
            .files
            .iter()
            .position(|f| &f.id == id)
            .ok_or_else(|| FileSetError::NotFound(id.clone()))?;

        let was_active = self.active_id() == id;
        let removed = self.files.remove(index);
        if was_active {
            self.active = Some(self.files[0].id.clone());
        }
        self.touch();

        Ok(removed)
    }

    /// Replace a file's content. Unknown ids are ignored.
    ///
    /// Returns whether a file was updated.
    pub fn update_file_content(&mut self, id: &FileId, content: impl Into<String>) -> bool {
        let Some(file) = self.files.iter_mut().find(|f| &f.id == id) else {
            return false;
        };
        file.content = content.into();
        self.touch();
        true
    }

    /// Focus a file in the editor.
    pub fn set_active(&mut self, id: &FileId) -> Result<(), FileSetError> {
        if self.file(id).is_none() {
            return Err(FileSetError::NotFound(id.clone()));
        }
        self.active = Some(id.clone());
        Ok(())
    }

    /// Project slug for share URLs.
    pub fn slug(&self) -> String {
        slug::project_slug(&self.name)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
