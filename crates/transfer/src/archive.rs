//! ZIP expansion: unpack an archive in memory and upload its entries one by
//! one under their base names.

use std::io::{Cursor, Read};

use tracing::{debug, info, warn};
use zip::ZipArchive;

use crate::chunked::ChunkedUploader;
use crate::mime::is_dicom_name;
use crate::types::UploadedFile;
use crate::validation::validate_entry_path;
use crate::TransferError;

/// One file extracted from an archive.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveEntry {
    /// Full path inside the archive.
    pub entry_path: String,
    /// Name the entry is uploaded under.
    pub file_name: String,
    pub data: Vec<u8>,
}

/// An entry that could not be extracted or uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryFailure {
    pub entry_path: String,
    pub error: String,
}

#[derive(Debug, Default)]
pub struct ExpandedArchive {
    pub entries: Vec<ArchiveEntry>,
    pub failed: Vec<EntryFailure>,
}

/// Outcome of uploading an archive's contents.
#[derive(Debug)]
pub struct ArchiveReport {
    pub archive_name: String,
    pub uploaded: Vec<(String, UploadedFile)>,
    pub failed: Vec<EntryFailure>,
}

impl ArchiveReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Reads every file entry of a ZIP held in memory.
///
/// Directories are skipped. With `dicom_only`, entries without a
/// `.dcm`/`.dicom` extension are skipped too. Entries with unsafe names or
/// unreadable contents land in `failed`; a payload that is not a ZIP at all
/// is an [`TransferError::Archive`].
pub fn expand_archive(
    data: &[u8],
    archive_name: &str,
    dicom_only: bool,
) -> Result<ExpandedArchive, TransferError> {
    let mut archive = ZipArchive::new(Cursor::new(data)).map_err(|e| TransferError::Archive {
        name: archive_name.to_string(),
        reason: e.to_string(),
    })?;

    let mut expanded = ExpandedArchive::default();
    for index in 0..archive.len() {
        let mut entry = match archive.by_index(index) {
            Ok(entry) => entry,
            Err(e) => {
                expanded.failed.push(EntryFailure {
                    entry_path: format!("#{index}"),
                    error: e.to_string(),
                });
                continue;
            }
        };
        if entry.is_dir() {
            continue;
        }

        let entry_path = entry.name().to_string();
        if dicom_only && !is_dicom_name(&entry_path) {
            debug!(archive = archive_name, entry = %entry_path, "skipping non-DICOM entry");
            continue;
        }

        let file_name = match validate_entry_path(&entry_path) {
            Ok(name) => name.to_string(),
            Err(e) => {
                warn!(archive = archive_name, entry = %entry_path, error = %e, "rejecting archive entry");
                expanded.failed.push(EntryFailure {
                    entry_path,
                    error: e.to_string(),
                });
                continue;
            }
        };

        let mut buf = Vec::with_capacity(capacity_hint(entry.size(), data.len()));
        if let Err(e) = entry.read_to_end(&mut buf) {
            expanded.failed.push(EntryFailure {
                entry_path,
                error: e.to_string(),
            });
            continue;
        }

        expanded.entries.push(ArchiveEntry {
            entry_path,
            file_name,
            data: buf,
        });
    }

    debug!(
        archive = archive_name,
        entries = expanded.entries.len(),
        failed = expanded.failed.len(),
        "archive expanded"
    );
    Ok(expanded)
}

impl ChunkedUploader<'_> {
    /// Expands a ZIP and uploads each entry into `folder_id`.
    ///
    /// Per-entry failures are recorded and the remaining entries still go
    /// up. Only a malformed archive fails the whole call.
    pub async fn upload_archive(
        &self,
        data: &[u8],
        archive_name: &str,
        folder_id: &str,
        dicom_only: bool,
    ) -> Result<ArchiveReport, TransferError> {
        let expanded = expand_archive(data, archive_name, dicom_only)?;
        let mut report = ArchiveReport {
            archive_name: archive_name.to_string(),
            uploaded: Vec::with_capacity(expanded.entries.len()),
            failed: expanded.failed,
        };

        for entry in expanded.entries {
            match self.upload(&entry.data, folder_id, &entry.file_name).await {
                Ok(file) => report.uploaded.push((entry.entry_path, file)),
                Err(e) => {
                    warn!(
                        archive = archive_name,
                        entry = %entry.entry_path,
                        error = %e,
                        "archive entry upload failed"
                    );
                    report.failed.push(EntryFailure {
                        entry_path: entry.entry_path,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            archive = archive_name,
            uploaded = report.uploaded.len(),
            failed = report.failed.len(),
            "archive upload finished"
        );
        Ok(report)
    }
}

/// Preallocation for an entry: its declared size, but never more than the
/// archive itself. The buffer still grows if the entry really is larger.
fn capacity_hint(declared_size: u64, archive_len: usize) -> usize {
    usize::try_from(declared_size).map_or(archive_len, |size| size.min(archive_len))
}
