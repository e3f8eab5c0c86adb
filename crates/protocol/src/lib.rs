//! Shared types for medsync: Girder REST documents, sync paths and
//! local file records.
//!
//! Every other crate in the workspace speaks these types. Remote response
//! shapes are normalized here so the resolver and uploader never branch
//! on raw JSON.

pub mod constants;
pub mod error;
pub mod girder;
pub mod path;
pub mod record;

// Re-export primary types for convenience.
pub use constants::{CENTER_FOLDER_PREFIX, CHUNK_SIZE, DEFAULT_MIME_TYPE};
pub use error::RemoteError;
pub use girder::{ChunkAck, Folder, FolderList, GirderFile, UploadHandle};
pub use path::{FolderLevel, PathKey};
pub use record::{NewFileRecord, SyncRecord};
