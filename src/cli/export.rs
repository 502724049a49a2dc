//! `websketch export`: write the project archive.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::project_dir::load_project;
use crate::export::{archive_file_name, export_archive};
use crate::log;

/// Export `dir` as a zip. Returns the archive path.
pub fn export_project(dir: &Path, output: Option<&Path>) -> Result<PathBuf> {
    let project = load_project(dir)?;
    let bytes = export_archive(&project)
        .with_context(|| format!("Failed to export '{}'", project.name))?;

    let path = output.map_or_else(|| PathBuf::from(archive_file_name(&project)), Path::to_path_buf);
    fs::write(&path, &bytes).with_context(|| format!("Failed to write '{}'", path.display()))?;

    log!("export"; "{} ({} files) -> {}", project.name, project.files().len(), path.display());
    Ok(path)
}
