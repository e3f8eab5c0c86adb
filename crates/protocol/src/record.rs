//! Local file records tracked for sync.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::path::PathKey;

/// A locally ingested file and its sync state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncRecord {
    pub id: i64,
    pub path: PathKey,
    pub file_name: String,
    pub disk_location: PathBuf,
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_file_id: Option<String>,
    pub synced: bool,
    pub uploaded_at: DateTime<Utc>,
}

/// Fields needed to ingest a new file.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFileRecord {
    pub path: PathKey,
    pub file_name: String,
    pub disk_location: PathBuf,
    pub size: u64,
    pub mime_type: Option<String>,
}
