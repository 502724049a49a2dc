//! File set validation errors.

use thiserror::Error;

use super::FileId;

/// Rejected file set mutations. The project is left untouched in every case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileSetError {
    #[error("a file named `{0}` already exists")]
    DuplicateName(String),

    #[error("file name must not be empty")]
    InvalidName,

    #[error("cannot remove the last remaining file")]
    LastFile,

    #[error("no file with id `{0}`")]
    NotFound(FileId),
}
