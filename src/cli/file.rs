//! `websketch file`: edit the file set of a project directory.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use owo_colors::OwoColorize;

use super::args::FileAction;
use super::project_dir::{load_project, write_project};
use crate::log;

pub fn run_file(dir: &Path, action: &FileAction) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    run(dir, action, &mut stdout)
}

fn run(dir: &Path, action: &FileAction, out: &mut impl Write) -> Result<()> {
    let mut project = load_project(dir)?;

    match action {
        FileAction::Add { name } => {
            let file = project.add_file(name, None)?;
            log!("file"; "added {} ({})", file.name, file.kind.label());
            write_project(dir, &project)?;
        }
        FileAction::Rm { name } => {
            let id = project
                .file_by_name(name)
                .map(|f| f.id.clone())
                .ok_or_else(|| anyhow!("no file named '{}' in {}", name, project.name))?;
            let removed = project.remove_file(&id)?;
            write_project(dir, &project)?;

            let path = dir.join(&removed.name);
            if path.is_file() {
                fs::remove_file(&path)
                    .with_context(|| format!("Failed to remove '{}'", path.display()))?;
            }
            log!("file"; "removed {}", removed.name);
        }
        FileAction::List => {
            for (index, file) in project.files().iter().enumerate() {
                writeln!(
                    out,
                    "{:>2}  {}  {}",
                    (index + 1).dimmed(),
                    file.name.bold(),
                    file.kind.label().dimmed(),
                )?;
            }
        }
    }
    Ok(())
}
