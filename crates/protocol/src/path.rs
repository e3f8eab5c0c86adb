//! Four-level folder paths (Center → Patient → Visit → Document).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::CENTER_FOLDER_PREFIX;

/// One level of the folder hierarchy, root first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FolderLevel {
    Center,
    Patient,
    Visit,
    Document,
}

impl FolderLevel {
    /// All levels from the root down.
    pub const ALL: [FolderLevel; 4] = [
        FolderLevel::Center,
        FolderLevel::Patient,
        FolderLevel::Visit,
        FolderLevel::Document,
    ];

    /// Depth below the root folder (1-based).
    pub fn depth(self) -> usize {
        match self {
            FolderLevel::Center => 1,
            FolderLevel::Patient => 2,
            FolderLevel::Visit => 3,
            FolderLevel::Document => 4,
        }
    }

    /// Levels from the root down to and including `self`.
    pub fn path_to(self) -> &'static [FolderLevel] {
        &Self::ALL[..self.depth()]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FolderLevel::Center => "center",
            FolderLevel::Patient => "patient",
            FolderLevel::Visit => "visit",
            FolderLevel::Document => "document",
        }
    }
}

impl fmt::Display for FolderLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies a document-type folder by its four names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathKey {
    pub center_code: String,
    pub patient_id: String,
    pub visit_name: String,
    pub document_name: String,
}

impl PathKey {
    pub fn new(
        center_code: impl Into<String>,
        patient_id: impl Into<String>,
        visit_name: impl Into<String>,
        document_name: impl Into<String>,
    ) -> Self {
        Self {
            center_code: center_code.into(),
            patient_id: patient_id.into(),
            visit_name: visit_name.into(),
            document_name: document_name.into(),
        }
    }

    /// Remote folder name at `level`.
    pub fn folder_name(&self, level: FolderLevel) -> String {
        match level {
            FolderLevel::Center => center_folder_name(&self.center_code),
            FolderLevel::Patient => self.patient_id.clone(),
            FolderLevel::Visit => self.visit_name.clone(),
            FolderLevel::Document => self.document_name.clone(),
        }
    }

    /// Remote folder names from the root down to `level`.
    pub fn segments_to(&self, level: FolderLevel) -> Vec<String> {
        level
            .path_to()
            .iter()
            .map(|l| self.folder_name(*l))
            .collect()
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            center_folder_name(&self.center_code),
            self.patient_id,
            self.visit_name,
            self.document_name
        )
    }
}

/// Remote folder name of a center (`Bordeaux` → `CHU_Bordeaux`).
pub fn center_folder_name(center_code: &str) -> String {
    format!("{CENTER_FOLDER_PREFIX}{center_code}")
}
