//! Sync of the local store to a Girder folder tree.
//!
//! This crate holds the business logic only. The app provides
//! `FolderService` and `FileService` implementations that bridge to the
//! Girder HTTP client.
//!
//! # Operations
//!
//! 1. **Resolve**: map a path key to a remote folder id, creating folders
//! 2. **Sync**: upload unsynced records and mark them synced
//! 3. **Structure**: mirror every local document path remotely
//! 4. **Patient**: attach demographics to a patient folder and upload
//!    files into it
//! 5. **Upload**: push a local file (or a ZIP's entries) directly

pub mod error;
pub mod ingest;
pub mod report;
pub mod resolver;
pub mod runner;
pub mod service;

#[cfg(test)]
pub(crate) mod mock;

pub use error::{ErrorKind, SyncError};
pub use ingest::{ingest_file, upload_dir};
pub use report::{
    FileFailure, FileSyncDetail, PathFailure, PatientInfo, PatientUploadReport, StructureReport,
    SyncReport, SyncStatus, UploadOutcome,
};
pub use resolver::FolderResolver;
pub use runner::{SyncConfig, SyncRunner};
pub use service::FolderService;
