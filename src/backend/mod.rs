//! External collaborators: persistence and the collaboration channel.
//!
//! Passed around explicitly as a [`Backend`] capability; nothing in the
//! editor core reaches for a global client.

mod error;
mod store;

use std::path::PathBuf;
use std::sync::Arc;

pub use error::BackendError;
pub use store::LocalStore;

use crate::collab::{CollabChannel, LoopbackHub};
use crate::project::{Project, ProjectId};

/// Where projects live between sessions.
pub trait PersistenceService: Send + Sync {
    fn save(&self, project: &Project) -> Result<(), BackendError>;
    /// Live projects of `owner` (every owner when `None`).
    fn list(&self, owner: Option<&str>) -> Result<Vec<Project>, BackendError>;
    fn load(&self, id: &ProjectId) -> Result<Project, BackendError>;
    /// Move to the trash.
    fn delete(&self, id: &ProjectId) -> Result<(), BackendError>;
    /// Bring back from the trash.
    fn restore(&self, id: &ProjectId) -> Result<Project, BackendError>;
    /// Erase from the trash for good.
    fn purge(&self, id: &ProjectId) -> Result<(), BackendError>;
    fn list_trash(&self, owner: Option<&str>) -> Result<Vec<Project>, BackendError>;
    fn set_public(&self, id: &ProjectId, public: bool) -> Result<(), BackendError>;
    fn set_pinned(&self, id: &ProjectId, pinned: bool) -> Result<(), BackendError>;
}

/// Backend capability handed to an editor session.
#[derive(Clone)]
pub struct Backend {
    pub store: Arc<dyn PersistenceService>,
    pub channel: Arc<dyn CollabChannel>,
}

impl Backend {
    pub fn new(store: Arc<dyn PersistenceService>, channel: Arc<dyn CollabChannel>) -> Self {
        Self { store, channel }
    }

    /// Filesystem store plus an in-process channel.
    pub fn local(dir: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(LocalStore::new(dir)), Arc::new(LoopbackHub::new()))
    }
}
