//! `websketch store`: manage projects in the local store.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use super::args::StoreAction;
use super::project_dir::{load_project, write_project};
use crate::backend::{LocalStore, PersistenceService};
use crate::config::SketchConfig;
use crate::log;
use crate::project::{Project, ProjectId};

pub fn run_store(action: &StoreAction, config: &SketchConfig) -> Result<()> {
    let store = LocalStore::new(&config.store.dir);
    let mut stdout = std::io::stdout().lock();
    run(action, &store, &mut stdout)
}

fn run(action: &StoreAction, store: &dyn PersistenceService, out: &mut impl Write) -> Result<()> {
    match action {
        StoreAction::Save { dir } => {
            let project = load_project(dir)?;
            store.save(&project)?;
            log!("store"; "saved {} ({})", project.name, project.id);
        }
        StoreAction::List { owner } => {
            let projects = store.list(owner.as_deref())?;
            print_projects(out, &projects, false)?;
        }
        StoreAction::Checkout { id, dir } => {
            let project = store.load(&ProjectId::from(id.as_str()))?;
            let dir = checkout_dir(&project, dir.as_deref());
            write_project(&dir, &project)
                .with_context(|| format!("Failed to check out {}", project.name))?;
            log!("store"; "{} -> {}", project.name, dir.display());
        }
        StoreAction::Delete { id } => {
            store.delete(&ProjectId::from(id.as_str()))?;
            log!("store"; "moved {} to trash", id);
        }
        StoreAction::Trash { owner } => {
            let projects = store.list_trash(owner.as_deref())?;
            print_projects(out, &projects, true)?;
        }
        StoreAction::Restore { id } => {
            let project = store.restore(&ProjectId::from(id.as_str()))?;
            log!("store"; "restored {}", project.name);
        }
        StoreAction::Purge { id } => {
            store.purge(&ProjectId::from(id.as_str()))?;
            log!("store"; "erased {}", id);
        }
        StoreAction::Pin { id, pinned } => {
            store.set_pinned(&ProjectId::from(id.as_str()), *pinned)?;
            log!("store"; "{} {}", if *pinned { "pinned" } else { "unpinned" }, id);
        }
        StoreAction::Publish { id, public } => {
            store.set_public(&ProjectId::from(id.as_str()), *public)?;
            log!("store"; "{} is now {}", id, if *public { "public" } else { "private" });
        }
    }
    Ok(())
}

/// `dir`, or a directory named after the project slug (its id if the name has none).
fn checkout_dir(project: &Project, dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = dir {
        return dir.to_path_buf();
    }
    match project.slug() {
        slug if slug.is_empty() => PathBuf::from(project.id.as_str()),
        slug => PathBuf::from(slug),
    }
}

fn print_projects(out: &mut impl Write, projects: &[Project], trash: bool) -> Result<()> {
    if projects.is_empty() {
        let empty = if trash { "trash is empty" } else { "no projects" };
        writeln!(out, "{}", empty.dimmed())?;
        return Ok(());
    }
    for project in projects {
        let when = match (trash, project.deleted_at) {
            (true, Some(deleted)) => deleted,
            _ => project.updated_at,
        };
        let marker = if project.is_pinned { "*" } else { " " };
        let visibility = if project.is_public { "public" } else { "private" };
        writeln!(
            out,
            "{} {}  {}  {}  {}",
            marker.yellow(),
            project.id.as_str().dimmed(),
            project.name.bold(),
            visibility,
            when.format("%Y-%m-%d %H:%M").to_string().dimmed(),
        )?;
    }
    Ok(())
}
