//! `websketch new`: create a seeded project directory.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

use super::project_dir::write_project;
use crate::log;
use crate::project::{Project, ProjectKind};

/// Create a project in `dir`, which must not exist or be empty.
pub fn new_project(
    dir: &Path,
    name: Option<&str>,
    description: Option<&str>,
    single: bool,
) -> Result<Project> {
    validate_target(dir)?;

    let name = match name {
        Some(name) => name.to_string(),
        None => dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Untitled".to_string()),
    };
    let kind = if single { ProjectKind::Single } else { ProjectKind::Multi };
    let project = Project::new(name, description.unwrap_or_default(), kind);

    write_project(dir, &project)?;
    log!("new"; "created {} ({} files) in {}", project.name, project.files().len(), dir.display());
    Ok(project)
}

fn validate_target(dir: &Path) -> Result<()> {
    if !dir.exists() {
        return Ok(());
    }
    if !dir.is_dir() {
        bail!("'{}' exists and is not a directory", dir.display());
    }
    let is_empty = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory '{}'", dir.display()))?
        .next()
        .is_none();
    if !is_empty {
        bail!(
            "Directory '{}' is not empty.\n\
             Choose a different name or remove the existing files.",
            dir.display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_multi() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("landing");
        let project = new_project(&dir, None, Some("hello"), false).unwrap();

        assert_eq!(project.name, "landing");
        for name in ["index.html", "about.html", "styles.css", "script.js", "sketch.json"] {
            assert!(dir.join(name).is_file(), "missing {name}");
        }
    }

    #[test]
    fn test_new_single_named() {
        let temp = TempDir::new().unwrap();
        let project = new_project(temp.path(), Some("Solo"), None, true).unwrap();
        assert_eq!(project.name, "Solo");
        assert_eq!(project.files().len(), 1);
        assert!(!temp.path().join("styles.css").exists());
    }

    #[test]
    fn test_non_empty_rejected() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("notes.txt"), "x").unwrap();
        assert!(new_project(temp.path(), None, None, false).is_err());
    }
}
