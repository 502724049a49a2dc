//! Archive export.
//!
//! A project becomes a zip holding every file at its name plus a generated
//! `README.md` describing the project.

use std::io::{Cursor, Write};

use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::project::{Project, slug};

const MANIFEST_NAME: &str = "README.md";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot build archive")]
    Zip(#[from] zip::result::ZipError),
    #[error("cannot write archive entry")]
    Io(#[from] std::io::Error),
}

/// Zip the project in memory.
pub fn export_archive(project: &Project) -> Result<Vec<u8>, ExportError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for file in project.files() {
        zip.start_file(file.name.as_str(), options)?;
        zip.write_all(file.content.as_bytes())?;
    }

    // A user-authored README takes precedence over the generated one.
    if project.file_by_name(MANIFEST_NAME).is_none() {
        zip.start_file(MANIFEST_NAME, options)?;
        zip.write_all(manifest(project).as_bytes())?;
    }

    Ok(zip.finish()?.into_inner())
}

/// `My Site!` → `My_Site__export.zip`
pub fn archive_file_name(project: &Project) -> String {
    format!("{}_export.zip", slug::archive_stem(&project.name))
}

/// Generated `README.md`.
pub fn manifest(project: &Project) -> String {
    let description = if project.description.trim().is_empty() {
        "No description provided"
    } else {
        project.description.as_str()
    };
    let files: Vec<String> = project
        .files()
        .iter()
        .map(|f| format!("- {} ({})", f.name, f.kind))
        .collect();

    format!(
        "# {name}\n\n{description}\n\n## Project Details\n- Type: {kind}\n- Created: {created}\n- Last Updated: {updated}\n- Files: {count}\n\n## Files Included\n{files}\n\n---\nExported from Web Sketch Studio\n",
        name = project.name,
        kind = project.kind.label(),
        created = project.created_at.format("%Y-%m-%d"),
        updated = project.updated_at.format("%Y-%m-%d"),
        count = project.files().len(),
        files = files.join("\n"),
    )
}
