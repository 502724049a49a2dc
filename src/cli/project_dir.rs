//! Projects stored as plain directories.
//!
//! ```text
//! my-sketch/
//! ├── sketch.json   # id, name, description, type, files (tab order)
//! ├── index.html
//! ├── about.html
//! ├── styles.css
//! └── script.js
//! ```
//!
//! The manifest is optional. Listed files missing on disk load empty, and
//! files on disk the manifest does not list are appended in name order.

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::compose::compose;
use crate::preview::{CompositionFailure, DocumentSource};
use crate::project::{FileId, FileKind, Project, ProjectFile, ProjectId, ProjectKind};

/// Manifest file name inside a project directory.
pub const MANIFEST: &str = "sketch.json";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Manifest {
    id: ProjectId,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "type", default)]
    kind: ProjectKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    files: Vec<ManifestEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ManifestEntry {
    id: FileId,
    name: String,
    kind: FileKind,
}

/// Load the project stored in `dir`.
pub fn load_project(dir: &Path) -> Result<Project> {
    if !dir.is_dir() {
        bail!("'{}' is not a project directory", dir.display());
    }
    let manifest = read_manifest(dir)?;

    let mut files = Vec::new();
    if let Some(manifest) = &manifest {
        for entry in &manifest.files {
            let content = read_optional(&dir.join(&entry.name))?;
            files.push(ProjectFile {
                id: entry.id.clone(),
                name: entry.name.clone(),
                kind: entry.kind,
                content,
            });
        }
    }

    for name in unlisted_files(dir, &files)? {
        let content = fs::read_to_string(dir.join(&name))
            .with_context(|| format!("Failed to read '{}'", dir.join(&name).display()))?;
        files.push(ProjectFile::named(name, content));
    }

    let name = match &manifest {
        Some(manifest) => manifest.name.clone(),
        None => dir_name(dir),
    };
    let kind = manifest.as_ref().map_or(ProjectKind::Multi, |m| m.kind);

    let mut project = Project::from_files(name, kind, files)
        .with_context(|| format!("Invalid project in '{}'", dir.display()))?;
    if let Some(manifest) = manifest {
        project.id = manifest.id;
        project.description = manifest.description;
        if let Some(created_at) = manifest.created_at {
            project.created_at = created_at;
        }
    }
    Ok(project)
}

/// Write every file of `project` plus the manifest into `dir`.
pub fn write_project(dir: &Path, project: &Project) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory '{}'", dir.display()))?;

    for file in project.files() {
        if !is_plain_name(&file.name) {
            bail!("file name '{}' cannot be written to disk", file.name);
        }
        let path = dir.join(&file.name);
        fs::write(&path, &file.content)
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
    }

    let manifest = Manifest {
        id: project.id.clone(),
        name: project.name.clone(),
        description: project.description.clone(),
        kind: project.kind,
        created_at: Some(project.created_at),
        files: project
            .files()
            .iter()
            .map(|f| ManifestEntry {
                id: f.id.clone(),
                name: f.name.clone(),
                kind: f.kind,
            })
            .collect(),
    };
    let path = dir.join(MANIFEST);
    let json = serde_json::to_string_pretty(&manifest)?;
    fs::write(&path, json).with_context(|| format!("Failed to write '{}'", path.display()))?;
    Ok(())
}

/// Reads the directory afresh on every composition.
pub struct DiskSource {
    dir: PathBuf,
}

impl DiskSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DocumentSource for DiskSource {
    fn document(&self, entry: Option<&str>) -> Result<String, CompositionFailure> {
        let project = load_project(&self.dir).map_err(|e| CompositionFailure(format!("{e:#}")))?;
        Ok(compose(project.files(), entry))
    }
}

// ============================================================================
// helpers
// ============================================================================

fn read_manifest(dir: &Path) -> Result<Option<Manifest>> {
    let path = dir.join(MANIFEST);
    if !path.is_file() {
        return Ok(None);
    }
    let content =
        fs::read_to_string(&path).with_context(|| format!("Failed to read '{}'", path.display()))?;
    let manifest = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse '{}'", path.display()))?;
    Ok(Some(manifest))
}

fn read_optional(path: &Path) -> Result<String> {
    if !path.exists() {
        return Ok(String::new());
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read '{}'", path.display()))
}

/// Regular, non-hidden files not yet in `known`, sorted by name.
fn unlisted_files(dir: &Path, known: &[ProjectFile]) -> Result<Vec<String>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to read directory '{}'", dir.display()))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if name == MANIFEST || name.starts_with('.') || known.iter().any(|f| f.name == name) {
            continue;
        }
        names.push(name);
    }
    names.sort();
    Ok(names)
}

fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(components.next(), Some(Component::Normal(_))) && components.next().is_none()
}

fn dir_name(dir: &Path) -> String {
    dir.canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "Untitled".to_string())
}
