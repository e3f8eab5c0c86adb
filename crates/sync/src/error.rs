//! Sync error types.

use std::path::PathBuf;

use medsync_protocol::{FolderLevel, RemoteError};
use medsync_store::StoreError;
use medsync_transfer::TransferError;

/// Errors produced while resolving folders or syncing files.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("{level} folder '{name}' does not exist under {parent_id}")]
    MissingFolder {
        level: FolderLevel,
        name: String,
        parent_id: String,
    },

    #[error("remote error at {level} folder '{name}': {source}")]
    RemoteAccess {
        level: FolderLevel,
        name: String,
        #[source]
        source: RemoteError,
    },

    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("source file missing: {}", .0.display())]
    SourceMissing(PathBuf),
}

/// Coarse classification used in reports and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network failure, non-2xx answer or undecodable body.
    RemoteAccess,
    /// An ancestor folder is missing and may not be created.
    Structure,
    /// The transfer did not reach a verified terminal state.
    Upload,
    /// Malformed archive.
    Archive,
    /// Local disk or database failure.
    Local,
}

impl SyncError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SyncError::MissingFolder { .. } => ErrorKind::Structure,
            SyncError::RemoteAccess { .. }
            | SyncError::Remote(_)
            | SyncError::Transfer(TransferError::Remote { .. }) => ErrorKind::RemoteAccess,
            SyncError::Transfer(TransferError::Archive { .. }) => ErrorKind::Archive,
            // Unsafe archive entries are per-entry failures; a bare
            // InvalidPath is a local file without a name.
            SyncError::Transfer(TransferError::Io(_) | TransferError::InvalidPath(_)) => {
                ErrorKind::Local
            }
            SyncError::Transfer(TransferError::Incomplete { .. } | TransferError::SizeMismatch { .. }) => {
                ErrorKind::Upload
            }
            SyncError::Store(_) | SyncError::Io(_) | SyncError::SourceMissing(_) => {
                ErrorKind::Local
            }
        }
    }

    /// Folder level the failure is tied to, if any.
    pub fn level(&self) -> Option<FolderLevel> {
        match self {
            SyncError::MissingFolder { level, .. } | SyncError::RemoteAccess { level, .. } => {
                Some(*level)
            }
            _ => None,
        }
    }
}
