//! Sync operations over the local store.
//!
//! Every batch operation is sequential: one record, one folder chain, one
//! upload at a time. Per-item failures land in the report and the batch
//! moves on; only a failure to read the store aborts a batch.

use std::path::{Path, PathBuf};

use medsync_protocol::{Folder, FolderLevel, PathKey, SyncRecord};
use medsync_store::Store;
use medsync_transfer::{ChunkedUploader, FileService, UploadOptions, UploadedFile, mime_type_for};
use serde_json::json;
use tracing::{error, info, warn};

use crate::error::SyncError;
use crate::report::{
    FileFailure, FileSyncDetail, PathFailure, PatientInfo, PatientUploadReport, StructureReport,
    SyncReport, UploadOutcome,
};
use crate::resolver::FolderResolver;
use crate::service::FolderService;

const ZIP_MIME_TYPE: &str = "application/zip";

/// Settings shared by every sync operation.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Remote folder the center folders live under.
    pub root_folder_id: String,
    pub public: bool,
    /// Lets batch sync create missing folders. Schema creation, patient
    /// sync and direct uploads always create.
    pub create_missing: bool,
    pub upload: UploadOptions,
    /// Only upload `.dcm`/`.dicom` entries when expanding archives.
    pub dicom_only: bool,
}

impl SyncConfig {
    pub fn new(root_folder_id: impl Into<String>) -> Self {
        Self {
            root_folder_id: root_folder_id.into(),
            public: true,
            create_missing: false,
            upload: UploadOptions::default(),
            dicom_only: false,
        }
    }
}

/// Drives folder resolution and uploads for records in the local store.
pub struct SyncRunner<'a> {
    folders: &'a dyn FolderService,
    files: &'a dyn FileService,
    store: &'a Store,
    config: SyncConfig,
}

impl<'a> SyncRunner<'a> {
    pub fn new(
        folders: &'a dyn FolderService,
        files: &'a dyn FileService,
        store: &'a Store,
        config: SyncConfig,
    ) -> Self {
        Self {
            folders,
            files,
            store,
            config,
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Resolver configured from [`SyncConfig`].
    pub fn resolver(&self) -> FolderResolver<'_> {
        FolderResolver::new(self.folders, self.store)
            .public(self.config.public)
            .create_missing(self.config.create_missing)
    }

    fn uploader(&self) -> ChunkedUploader<'_> {
        ChunkedUploader::new(self.files, self.config.upload.clone())
    }

    /// Uploads every unsynced record, oldest first.
    pub async fn sync_all(&self) -> Result<SyncReport, SyncError> {
        let records = self.store.unsynced_records()?;
        let mut report = SyncReport::default();
        if records.is_empty() {
            info!("nothing to sync");
            return Ok(report);
        }

        info!(count = records.len(), "syncing unsynced records");
        for record in &records {
            let result = self.sync_one(record).await;
            report.push(FileSyncDetail::from_result(record, &result));
        }

        info!(
            total = report.total,
            synced = report.synced,
            failed = report.failed,
            "sync finished"
        );
        for failure in report.failures() {
            warn!(record = failure.record_id, file = %failure.file_name, error = %failure.message, "record not synced");
        }
        Ok(report)
    }

    /// Uploads one record. Records already synced are left alone.
    pub async fn sync_record(&self, record_id: i64) -> Result<FileSyncDetail, SyncError> {
        let record = self.store.record(record_id)?;
        if record.synced {
            info!(record = record_id, "record already synced");
            return Ok(FileSyncDetail::already_synced(&record));
        }
        let result = self.sync_one(&record).await;
        Ok(FileSyncDetail::from_result(&record, &result))
    }

    async fn sync_one(&self, record: &SyncRecord) -> Result<UploadedFile, SyncError> {
        if !tokio::fs::try_exists(&record.disk_location).await? {
            return Err(SyncError::SourceMissing(record.disk_location.clone()));
        }

        let folder_id = self
            .resolver()
            .resolve_folder(&record.path, &self.config.root_folder_id)
            .await?;

        let uploaded = self
            .uploader()
            .upload_path(&record.disk_location, &folder_id, Some(&record.file_name))
            .await
            .inspect_err(|e| {
                error!(record = record.id, file = %record.file_name, error = %e, "upload failed")
            })?;

        self.store.mark_synced(record.id, &uploaded.file_id)?;
        info!(record = record.id, file_id = %uploaded.file_id, path = %record.path, "record synced");
        Ok(uploaded)
    }

    /// Mirrors every document path in the store remotely, creating
    /// whatever is missing.
    pub async fn create_structure(&self) -> Result<StructureReport, SyncError> {
        let paths = self.store.document_paths()?;
        let resolver = self.resolver().create_missing(true);
        let mut report = StructureReport::default();

        for path in paths {
            match resolver
                .resolve_folder(&path, &self.config.root_folder_id)
                .await
            {
                Ok(_) => report.resolved += 1,
                Err(e) => report.failures.push(PathFailure {
                    path,
                    error: e.to_string(),
                }),
            }
        }

        info!(
            resolved = report.resolved,
            failed = report.failures.len(),
            "remote structure created"
        );
        Ok(report)
    }

    /// Resolves the patient folder and attaches demographics to it.
    /// Returns the patient folder id.
    pub async fn sync_patient(&self, patient: &PatientInfo) -> Result<String, SyncError> {
        let key = PathKey::new(&patient.center_code, &patient.patient_id, "", "");
        let folder_id = self
            .resolver()
            .create_missing(true)
            .resolve_to(&key, FolderLevel::Patient, &self.config.root_folder_id)
            .await?;

        let metadata = json!({
            "center_code": patient.center_code,
            "patient_id": patient.patient_id,
            "age": patient.age,
            "sex": patient.sex,
        });
        self.folders
            .set_metadata(&folder_id, &metadata)
            .await
            .map_err(|source| SyncError::RemoteAccess {
                level: FolderLevel::Patient,
                name: patient.patient_id.clone(),
                source,
            })?;

        info!(patient = %patient.patient_id, center = %patient.center_code, folder_id = %folder_id, "patient metadata set");
        Ok(folder_id)
    }

    /// Syncs the patient folder, then uploads each of `paths` into it.
    ///
    /// Archives are uploaded as they are. A file that fails is reported
    /// and the rest continue; a patient folder or metadata failure aborts.
    pub async fn upload_patient_files(
        &self,
        patient: &PatientInfo,
        paths: &[PathBuf],
    ) -> Result<PatientUploadReport, SyncError> {
        let patient_folder_id = self.sync_patient(patient).await?;
        let uploader = self.uploader();
        let mut report = PatientUploadReport {
            patient_folder_id,
            uploaded: Vec::new(),
            failed: Vec::new(),
        };

        for path in paths {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            match uploader
                .upload_path(path, &report.patient_folder_id, None)
                .await
            {
                Ok(file) => report.uploaded.push(file),
                Err(e) => {
                    error!(patient = %patient.patient_id, file = %name, error = %e, "patient file upload failed");
                    report.failed.push(FileFailure {
                        name,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            patient = %patient.patient_id,
            uploaded = report.uploaded.len(),
            failed = report.failed.len(),
            "patient files uploaded"
        );
        Ok(report)
    }

    /// Uploads a local file straight into the folder for `key`.
    ///
    /// With `extract`, a ZIP is expanded and its entries uploaded one by
    /// one instead of the archive itself.
    pub async fn upload_file(
        &self,
        path: &Path,
        key: &PathKey,
        extract: bool,
    ) -> Result<UploadOutcome, SyncError> {
        if !tokio::fs::try_exists(path).await? {
            return Err(SyncError::SourceMissing(path.to_path_buf()));
        }
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| SyncError::SourceMissing(path.to_path_buf()))?;

        let folder_id = self
            .resolver()
            .create_missing(true)
            .resolve_folder(key, &self.config.root_folder_id)
            .await?;
        let uploader = self.uploader();

        if extract && mime_type_for(&file_name) == ZIP_MIME_TYPE {
            let data = tokio::fs::read(path).await?;
            let report = uploader
                .upload_archive(&data, &file_name, &folder_id, self.config.dicom_only)
                .await?;
            return Ok(UploadOutcome::Archive(report));
        }

        let file = uploader.upload_path(path, &folder_id, None).await?;
        Ok(UploadOutcome::File(file))
    }

    /// Checks that the root folder is reachable with the configured token.
    pub async fn health(&self) -> Result<Folder, SyncError> {
        let root = self.folders.get_folder(&self.config.root_folder_id).await?;
        Ok(root)
    }
}
