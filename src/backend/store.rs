//! Project store on the local filesystem.
//!
//! ```text
//! <dir>/
//! ├── projects/<id>.json
//! └── trash/<id>.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use super::{BackendError, PersistenceService};
use crate::project::{Project, ProjectId};

const PROJECTS_DIR: &str = "projects";
const TRASH_DIR: &str = "trash";

pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn live_path(&self, id: &ProjectId) -> PathBuf {
        self.root.join(PROJECTS_DIR).join(format!("{id}.json"))
    }

    fn trash_path(&self, id: &ProjectId) -> PathBuf {
        self.root.join(TRASH_DIR).join(format!("{id}.json"))
    }

    fn read(path: &Path) -> Result<Project, BackendError> {
        let text = fs::read_to_string(path).map_err(|e| BackendError::Io(path.to_path_buf(), e))?;
        let project: Project =
            serde_json::from_str(&text).map_err(|e| BackendError::Json(path.to_path_buf(), e))?;
        project
            .validate()
            .map_err(|e| BackendError::Invalid(path.to_path_buf(), e))?;
        Ok(project)
    }

    fn write(path: &Path, project: &Project) -> Result<(), BackendError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| BackendError::Io(parent.to_path_buf(), e))?;
        }
        let json = serde_json::to_string_pretty(project)
            .map_err(|e| BackendError::Json(path.to_path_buf(), e))?;
        fs::write(path, json).map_err(|e| BackendError::Io(path.to_path_buf(), e))
    }

    fn remove(path: &Path) -> Result<(), BackendError> {
        fs::remove_file(path).map_err(|e| BackendError::Io(path.to_path_buf(), e))
    }

    /// Every project in `dir` owned by `owner` (all when `None`).
    ///
    /// Unreadable entries are logged and skipped.
    fn scan(dir: &Path, owner: Option<&str>) -> Result<Vec<Project>, BackendError> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(BackendError::Io(dir.to_path_buf(), e)),
        };

        let mut projects = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| BackendError::Io(dir.to_path_buf(), e))?.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            let project = match Self::read(&path) {
                Ok(project) => project,
                Err(e) => {
                    crate::log!("store"; "skipping {}", e);
                    continue;
                }
            };
            if owner.is_none_or(|owner| project.owner.as_deref() == Some(owner)) {
                projects.push(project);
            }
        }
        Ok(projects)
    }

    /// Load, change and save a live project.
    fn update(&self, id: &ProjectId, f: impl FnOnce(&mut Project)) -> Result<(), BackendError> {
        let mut project = self.load(id)?;
        f(&mut project);
        project.updated_at = Utc::now();
        Self::write(&self.live_path(id), &project)
    }
}

impl PersistenceService for LocalStore {
    fn save(&self, project: &Project) -> Result<(), BackendError> {
        Self::write(&self.live_path(&project.id), project)
    }

    /// Pinned first, then most recently updated.
    fn list(&self, owner: Option<&str>) -> Result<Vec<Project>, BackendError> {
        let mut projects = Self::scan(&self.root.join(PROJECTS_DIR), owner)?;
        projects.sort_by(|a, b| {
            b.is_pinned
                .cmp(&a.is_pinned)
                .then_with(|| b.updated_at.cmp(&a.updated_at))
        });
        Ok(projects)
    }

    fn load(&self, id: &ProjectId) -> Result<Project, BackendError> {
        let path = self.live_path(id);
        if !path.is_file() {
            return Err(BackendError::NotFound(id.clone()));
        }
        Self::read(&path)
    }

    fn delete(&self, id: &ProjectId) -> Result<(), BackendError> {
        let mut project = self.load(id)?;
        project.deleted_at = Some(Utc::now());
        Self::write(&self.trash_path(id), &project)?;
        Self::remove(&self.live_path(id))
    }

    fn restore(&self, id: &ProjectId) -> Result<Project, BackendError> {
        let path = self.trash_path(id);
        if !path.is_file() {
            return Err(BackendError::NotFound(id.clone()));
        }
        let mut project = Self::read(&path)?;
        project.deleted_at = None;
        Self::write(&self.live_path(id), &project)?;
        Self::remove(&path)?;
        Ok(project)
    }

    fn purge(&self, id: &ProjectId) -> Result<(), BackendError> {
        let path = self.trash_path(id);
        if !path.is_file() {
            return Err(BackendError::NotFound(id.clone()));
        }
        Self::remove(&path)
    }

    /// Most recently deleted first.
    fn list_trash(&self, owner: Option<&str>) -> Result<Vec<Project>, BackendError> {
        let mut projects = Self::scan(&self.root.join(TRASH_DIR), owner)?;
        projects.sort_by(|a, b| b.deleted_at.cmp(&a.deleted_at));
        Ok(projects)
    }

    fn set_public(&self, id: &ProjectId, public: bool) -> Result<(), BackendError> {
        self.update(id, |p| p.is_public = public)
    }

    fn set_pinned(&self, id: &ProjectId, pinned: bool) -> Result<(), BackendError> {
        self.update(id, |p| p.is_pinned = pinned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::ProjectKind;
    use tempfile::TempDir;

    fn store() -> (TempDir, LocalStore) {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path());
        (dir, store)
    }

    fn project(name: &str, owner: &str) -> Project {
        let mut project = Project::new(name, "", ProjectKind::Multi);
        project.owner = Some(owner.to_string());
        project
    }

    #[test]
    fn test_list_skips_corrupt_entries() {
        let (dir, store) = store();
        let good = project("good", "alice");
        store.save(&good).unwrap();
        fs::write(dir.path().join(PROJECTS_DIR).join("broken.json"), "{ not json").unwrap();
        fs::create_dir_all(dir.path().join(TRASH_DIR)).unwrap();
        fs::write(dir.path().join(TRASH_DIR).join("broken.json"), "[]").unwrap();

        let listed = store.list(None).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, good.id);
        assert!(store.list_trash(None).unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let (_dir, store) = store();
        let project = project("demo", "alice");
        store.save(&project).unwrap();

        let loaded = store.load(&project.id).unwrap();
        assert_eq!(loaded.name, "demo");
        assert_eq!(loaded.files(), project.files());
    }

    #[test]
    fn test_list_filters_owner_and_orders_pinned_first() {
        let (_dir, store) = store();
        let a = project("a", "alice");
        let b = project("b", "alice");
        let c = project("c", "bob");
        for p in [&a, &b, &c] {
            store.save(p).unwrap();
        }
        store.set_pinned(&a.id, true).unwrap();

        let names: Vec<_> = store
            .list(Some("alice"))
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(store.list(None).unwrap().len(), 3);
    }

    #[test]
    fn test_trash_lifecycle() {
        let (_dir, store) = store();
        let project = project("demo", "alice");
        store.save(&project).unwrap();

        store.delete(&project.id).unwrap();
        assert!(store.list(None).unwrap().is_empty());
        assert!(matches!(store.load(&project.id), Err(BackendError::NotFound(_))));

        let trashed = store.list_trash(Some("alice")).unwrap();
        assert_eq!(trashed.len(), 1);
        assert!(trashed[0].deleted_at.is_some());

        let restored = store.restore(&project.id).unwrap();
        assert!(restored.deleted_at.is_none());
        assert!(store.list_trash(None).unwrap().is_empty());
        assert_eq!(store.list(None).unwrap().len(), 1);

        store.delete(&project.id).unwrap();
        store.purge(&project.id).unwrap();
        assert!(store.list_trash(None).unwrap().is_empty());
        assert!(matches!(store.restore(&project.id), Err(BackendError::NotFound(_))));
    }

    #[test]
    fn test_set_public() {
        let (_dir, store) = store();
        let project = project("demo", "alice");
        store.save(&project).unwrap();

        store.set_public(&project.id, true).unwrap();
        assert!(store.load(&project.id).unwrap().is_public);
    }

    #[test]
    fn test_missing_project() {
        let (_dir, store) = store();
        let id = ProjectId::from("nope");
        assert!(matches!(store.set_public(&id, true), Err(BackendError::NotFound(_))));
        assert!(matches!(store.purge(&id), Err(BackendError::NotFound(_))));
    }

    #[test]
    fn test_corrupt_file_reported() {
        let (dir, store) = store();
        let path = dir.path().join(PROJECTS_DIR);
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join("bad.json"), "{ not json").unwrap();

        assert!(matches!(store.list(None), Err(BackendError::Json(..))));
    }
}
