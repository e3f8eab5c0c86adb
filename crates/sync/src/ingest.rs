//! Local ingestion: copy a file under the uploads directory and record it
//! as pending sync.

use std::path::{Path, PathBuf};

use medsync_protocol::{NewFileRecord, PathKey, SyncRecord};
use medsync_store::{Store, document_code, visit_code};
use medsync_transfer::mime_type_for;
use tracing::info;

use crate::error::SyncError;

/// Directory a file for `key` is stored under:
/// `<uploads>/<center>/<patient>/<visit code>/<document code>`.
pub fn upload_dir(uploads_dir: &Path, key: &PathKey) -> PathBuf {
    uploads_dir
        .join(&key.center_code)
        .join(&key.patient_id)
        .join(visit_code(&key.visit_name))
        .join(document_code(&key.document_name))
}

/// Copies `source` into the uploads tree and creates its sync record.
pub async fn ingest_file(
    store: &Store,
    uploads_dir: &Path,
    source: &Path,
    key: &PathKey,
) -> Result<SyncRecord, SyncError> {
    let file_name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| SyncError::SourceMissing(source.to_path_buf()))?;
    if !tokio::fs::try_exists(source).await? {
        return Err(SyncError::SourceMissing(source.to_path_buf()));
    }

    let dir = upload_dir(uploads_dir, key);
    tokio::fs::create_dir_all(&dir).await?;
    let disk_location = dir.join(&file_name);
    let size = tokio::fs::copy(source, &disk_location).await?;

    let record = store.create_file_record(&NewFileRecord {
        path: key.clone(),
        mime_type: Some(mime_type_for(&file_name).to_string()),
        file_name,
        disk_location,
        size,
    })?;
    info!(record = record.id, file = %record.file_name, path = %key, size, "file ingested");
    Ok(record)
}
