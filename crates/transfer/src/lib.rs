//! Chunked file upload to a Girder-like file service.
//!
//! The upload is a three-phase exchange: open a session, send the payload
//! in chunks, then verify the file document the server hands back. There
//! is no resume across failures; a failed upload restarts from offset 0.

mod archive;
mod chunked;
mod mime;
mod service;
mod types;
mod validation;

#[cfg(test)]
pub(crate) mod mock;

pub use archive::{ArchiveEntry, ArchiveReport, EntryFailure, ExpandedArchive, expand_archive};
pub use chunked::ChunkedUploader;
pub use medsync_protocol::CHUNK_SIZE;
pub use mime::{is_dicom_name, mime_type_for};
pub use service::{BoxFuture, FileService};
pub use types::{UploadOptions, UploadSession, UploadedFile};
pub use validation::validate_entry_path;

use medsync_protocol::RemoteError;

/// Errors produced by the transfer crate.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("upload of '{file_name}' failed: {source}")]
    Remote {
        file_name: String,
        #[source]
        source: RemoteError,
    },

    #[error("incomplete transfer of '{file_name}': last offset {last_offset}, expected {expected}")]
    Incomplete {
        file_name: String,
        last_offset: u64,
        expected: u64,
    },

    #[error("size mismatch for '{file_name}': expected {expected}, remote reports {actual}")]
    SizeMismatch {
        file_name: String,
        expected: u64,
        actual: u64,
    },

    #[error("invalid archive '{name}': {reason}")]
    Archive { name: String, reason: String },

    #[error("invalid path: {0}")]
    InvalidPath(String),
}

impl TransferError {
    pub(crate) fn remote(file_name: &str, source: RemoteError) -> Self {
        TransferError::Remote {
            file_name: file_name.to_string(),
            source,
        }
    }
}
