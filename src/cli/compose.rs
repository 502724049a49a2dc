//! `websketch compose`: print or write the composed document.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::project_dir::load_project;
use crate::compose::{compose, compose_project_thumbnail};
use crate::config::SketchConfig;
use crate::log;

pub fn compose_project(
    dir: &Path,
    thumbnail: bool,
    output: Option<&Path>,
    config: &SketchConfig,
) -> Result<()> {
    let project = load_project(dir)?;

    let html = if thumbnail {
        compose_project_thumbnail(&project, &config.thumbnail.options())
    } else {
        compose(project.files(), config.preview.entry.as_deref())
    };

    match output {
        Some(path) => {
            fs::write(path, &html).with_context(|| format!("Failed to write '{}'", path.display()))?;
            log!("compose"; "{} -> {}", project.name, path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(html.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
