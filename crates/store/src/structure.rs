//! Read-only view of the local center / patient / visit / document tree.

use serde::Serialize;

/// A center and everything below it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CenterNode {
    pub code: String,
    pub name: String,
    pub folder_id: Option<String>,
    pub patients: Vec<PatientNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientNode {
    pub patient_id: String,
    pub folder_id: Option<String>,
    pub visits: Vec<VisitNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisitNode {
    pub name: String,
    pub code: String,
    pub folder_id: Option<String>,
    pub documents: Vec<DocumentNode>,
}

/// A document type with its file counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentNode {
    pub name: String,
    pub code: String,
    pub folder_id: Option<String>,
    pub file_count: usize,
    pub synced_count: usize,
}

impl DocumentNode {
    pub fn pending_count(&self) -> usize {
        self.file_count.saturating_sub(self.synced_count)
    }
}

/// One row of the flattened tree query. Lower levels are `None` when a
/// node has no children.
pub(crate) struct TreeRow {
    pub center: (String, String, Option<String>),
    pub patient: Option<(String, Option<String>)>,
    pub visit: Option<(String, String, Option<String>)>,
    pub document: Option<(String, String, Option<String>)>,
    pub file_count: usize,
    pub synced_count: usize,
}

pub(crate) const TREE_SELECT: &str = "
SELECT c.code, c.name, c.girder_folder_id,
       p.patient_id, p.girder_folder_id,
       v.visit_name, v.visit_code, v.girder_folder_id,
       dt.document_name, dt.document_code, dt.girder_folder_id,
       (SELECT COUNT(*) FROM files f WHERE f.document_type_id = dt.id),
       (SELECT COUNT(*) FROM files f WHERE f.document_type_id = dt.id AND f.synced_to_girder = 1)
FROM centers c
LEFT JOIN patients p ON p.center_id = c.id
LEFT JOIN visits v ON v.patient_id = p.id
LEFT JOIN document_types dt ON dt.visit_id = v.id
ORDER BY c.id, p.id, v.id, dt.id";

/// Folds rows ordered by center, patient, visit, document into a tree.
pub(crate) fn build_tree(rows: Vec<TreeRow>) -> Vec<CenterNode> {
    let mut centers: Vec<CenterNode> = Vec::new();

    for row in rows {
        let (code, name, folder_id) = row.center;
        if centers.last().is_none_or(|c| c.code != code) {
            centers.push(CenterNode {
                code,
                name,
                folder_id,
                patients: Vec::new(),
            });
        }
        let Some(center) = centers.last_mut() else {
            continue;
        };

        let Some((patient_id, folder_id)) = row.patient else {
            continue;
        };
        if center.patients.last().is_none_or(|p| p.patient_id != patient_id) {
            center.patients.push(PatientNode {
                patient_id,
                folder_id,
                visits: Vec::new(),
            });
        }
        let Some(patient) = center.patients.last_mut() else {
            continue;
        };

        let Some((name, code, folder_id)) = row.visit else {
            continue;
        };
        if patient.visits.last().is_none_or(|v| v.name != name) {
            patient.visits.push(VisitNode {
                name,
                code,
                folder_id,
                documents: Vec::new(),
            });
        }
        let Some(visit) = patient.visits.last_mut() else {
            continue;
        };

        if let Some((name, code, folder_id)) = row.document {
            visit.documents.push(DocumentNode {
                name,
                code,
                folder_id,
                file_count: row.file_count,
                synced_count: row.synced_count,
            });
        }
    }

    centers
}
