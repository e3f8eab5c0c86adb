//! Girder REST documents and their normalized forms.

use serde::{Deserialize, Serialize};

use crate::error::RemoteError;

/// A Girder folder document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_collection: Option<String>,
    #[serde(default)]
    pub public: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

/// Result of a folder search.
///
/// Girder answers either `{"data": [...]}` or a bare array depending on
/// version and endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FolderList {
    Wrapped { data: Vec<Folder> },
    Bare(Vec<Folder>),
}

impl FolderList {
    /// Returns the first folder, if any. Duplicate names are not
    /// disambiguated.
    pub fn into_first(self) -> Option<Folder> {
        let folders = match self {
            FolderList::Wrapped { data } => data,
            FolderList::Bare(folders) => folders,
        };
        folders.into_iter().next()
    }
}

/// A Girder file document.
///
/// `size` is optional because some backends answer the final chunk before
/// the file document is complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GirderFile {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
}

impl GirderFile {
    /// A file document is terminal once it carries both an id and a size.
    pub fn is_complete(&self) -> bool {
        !self.id.is_empty() && self.size.is_some()
    }
}

/// An upload session opened by `POST /file`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadHandle {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub received: u64,
}

/// Normalized answer to `POST /file/chunk` (or `POST /file/completion`).
///
/// While the upload is in progress Girder returns the upload document
/// (with `received`); the request that completes it returns the file
/// document instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkAck {
    pub received: Option<u64>,
    pub file: Option<GirderFile>,
}

impl ChunkAck {
    /// Interprets a raw chunk response.
    pub fn from_json(value: serde_json::Value) -> Result<Self, RemoteError> {
        let serde_json::Value::Object(ref map) = value else {
            return Err(RemoteError::Decode(format!(
                "chunk response is not an object: {value}"
            )));
        };

        if let Some(received) = map.get("received") {
            let received = received.as_u64().ok_or_else(|| {
                RemoteError::Decode(format!("invalid received offset: {received}"))
            })?;
            return Ok(Self {
                received: Some(received),
                file: None,
            });
        }

        if map.contains_key("_id") {
            let file: GirderFile =
                serde_json::from_value(value).map_err(|e| RemoteError::Decode(e.to_string()))?;
            return Ok(Self {
                received: None,
                file: Some(file),
            });
        }

        Ok(Self::default())
    }

    /// Returns the file document if it is complete (id and size present).
    pub fn terminal_file(&self) -> Option<&GirderFile> {
        self.file.as_ref().filter(|f| f.is_complete())
    }
}
