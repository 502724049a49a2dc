use std::path::PathBuf;

use thiserror::Error;

use crate::collab::ChannelError;
use crate::project::{FileSetError, ProjectId};

/// Persistence and channel failures. Local in-memory state is never
/// touched when one of these is returned.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("IO error at `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("malformed project file `{0}`")]
    Json(PathBuf, #[source] serde_json::Error),

    #[error("project file `{0}` is invalid")]
    Invalid(PathBuf, #[source] FileSetError),

    #[error("project `{0}` not found")]
    NotFound(ProjectId),

    #[error(transparent)]
    Channel(#[from] ChannelError),
}
