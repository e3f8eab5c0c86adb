//! Per-item outcomes collected by batch operations.

use medsync_protocol::{PathKey, SyncRecord};
use medsync_transfer::{ArchiveReport, UploadedFile};
use serde::{Deserialize, Serialize};

use crate::error::SyncError;

/// Overall result of a batch sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    FullySynced,
    PartiallySynced,
    NotSynced,
    NothingToSync,
}

/// Outcome for one file record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileSyncDetail {
    pub record_id: i64,
    pub file_name: String,
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_file_id: Option<String>,
}

impl FileSyncDetail {
    pub(crate) fn from_result(record: &SyncRecord, result: &Result<UploadedFile, SyncError>) -> Self {
        match result {
            Ok(file) => Self {
                record_id: record.id,
                file_name: record.file_name.clone(),
                success: true,
                message: format!("uploaded to {}", record.path),
                remote_file_id: Some(file.file_id.clone()),
            },
            Err(e) => Self {
                record_id: record.id,
                file_name: record.file_name.clone(),
                success: false,
                message: e.to_string(),
                remote_file_id: None,
            },
        }
    }

    pub(crate) fn already_synced(record: &SyncRecord) -> Self {
        Self {
            record_id: record.id,
            file_name: record.file_name.clone(),
            success: true,
            message: "already synced".into(),
            remote_file_id: record.remote_file_id.clone(),
        }
    }
}

/// Summary of a batch sync run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncReport {
    pub total: usize,
    pub synced: usize,
    pub failed: usize,
    pub details: Vec<FileSyncDetail>,
}

impl SyncReport {
    pub(crate) fn push(&mut self, detail: FileSyncDetail) {
        self.total += 1;
        if detail.success {
            self.synced += 1;
        } else {
            self.failed += 1;
        }
        self.details.push(detail);
    }

    pub fn status(&self) -> SyncStatus {
        match (self.total, self.synced, self.failed) {
            (0, _, _) => SyncStatus::NothingToSync,
            (_, _, 0) => SyncStatus::FullySynced,
            (_, 0, _) => SyncStatus::NotSynced,
            _ => SyncStatus::PartiallySynced,
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileSyncDetail> {
        self.details.iter().filter(|d| !d.success)
    }
}

/// A document path that could not be resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathFailure {
    pub path: PathKey,
    pub error: String,
}

/// Result of mirroring the whole local tree remotely.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StructureReport {
    pub resolved: usize,
    pub failures: Vec<PathFailure>,
}

/// Demographics attached to a patient folder as metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientInfo {
    pub center_code: String,
    pub patient_id: String,
    pub age: u32,
    pub sex: String,
}

/// A file that could not be uploaded into a patient folder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileFailure {
    pub name: String,
    pub error: String,
}

/// Result of uploading files into one patient folder.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientUploadReport {
    pub patient_folder_id: String,
    pub uploaded: Vec<UploadedFile>,
    pub failed: Vec<FileFailure>,
}

impl PatientUploadReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// What a direct upload produced.
#[derive(Debug)]
pub enum UploadOutcome {
    File(UploadedFile),
    Archive(ArchiveReport),
}
