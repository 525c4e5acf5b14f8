use std::path::PathBuf;

use thiserror::Error;

use super::types::RecordId;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Storage-level errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage at '{}' can not be accessed or created: {source}", .path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("{operation} failed: {source}")]
    WriteFailed {
        operation: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("{operation} failed: {source}")]
    ReadFailed {
        operation: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("record with ID {0} does not exist")]
    NotFound(RecordId),

    #[error("storage at '{}' can not be removed: {source}", .path.display())]
    CleanupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("storage connection can not be closed: {0}")]
    CloseFailed(#[source] rusqlite::Error),

    #[error("storage is already closed")]
    Closed,

    #[error("storage connection lock is poisoned")]
    Poisoned,
}

impl StoreError {
    pub(crate) fn unavailable(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        Self::StorageUnavailable {
            path: path.into(),
            source: source.into(),
        }
    }

    pub(crate) fn write(operation: &'static str) -> impl FnOnce(rusqlite::Error) -> Self {
        move |source| Self::WriteFailed { operation, source }
    }

    pub(crate) fn read(operation: &'static str) -> impl FnOnce(rusqlite::Error) -> Self {
        move |source| Self::ReadFailed { operation, source }
    }
}
