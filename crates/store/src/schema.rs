pub(crate) const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS centers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    code TEXT UNIQUE NOT NULL,
    name TEXT NOT NULL,
    girder_folder_id TEXT,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS patients (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    center_id INTEGER NOT NULL REFERENCES centers(id),
    patient_id TEXT NOT NULL,
    girder_folder_id TEXT,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    UNIQUE(center_id, patient_id)
);

CREATE TABLE IF NOT EXISTS visits (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    patient_id INTEGER NOT NULL REFERENCES patients(id),
    visit_name TEXT NOT NULL,
    visit_code TEXT NOT NULL,
    girder_folder_id TEXT,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    UNIQUE(patient_id, visit_name)
);

CREATE TABLE IF NOT EXISTS document_types (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    visit_id INTEGER NOT NULL REFERENCES visits(id),
    document_name TEXT NOT NULL,
    document_code TEXT NOT NULL,
    girder_folder_id TEXT,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    UNIQUE(visit_id, document_name)
);

CREATE TABLE IF NOT EXISTS files (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    document_type_id INTEGER NOT NULL REFERENCES document_types(id),
    filename TEXT NOT NULL,
    file_path TEXT NOT NULL,
    file_size INTEGER,
    mime_type TEXT,
    girder_file_id TEXT,
    synced_to_girder BOOLEAN DEFAULT 0,
    uploaded_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);
";

/// Demo centers: `(code, display name)`.
pub(crate) const DEMO_CENTERS: [(&str, &str); 3] = [
    ("Bordeaux", "CHU Bordeaux"),
    ("Paris", "CHU Paris"),
    ("Toulouse", "CHU Toulouse"),
];

pub(crate) const DEMO_PATIENTS_PER_CENTER: usize = 2;

/// Known visits: `(visit name, visit code)`.
pub(crate) const VISITS: [(&str, &str); 4] = [
    ("Inclusion M0", "M0"),
    ("Preinclusion M-6", "M-6"),
    ("Visite M12", "M12"),
    ("Visite M24", "M24"),
];

const COMMON_DOCUMENTS: [&str; 3] = ["Bilan Biologique", "Consentement_Eclaire", "Dosage des β HCG"];

/// Document types seeded under a visit.
pub(crate) fn demo_documents(visit_code: &str) -> Vec<&'static str> {
    let mut docs = COMMON_DOCUMENTS.to_vec();
    if visit_code == "M-6" {
        docs.push("ECG 12 derivations");
    }
    docs
}

/// Visit code for a visit name (`Inclusion M0` → `M0`); unknown visits
/// use their name.
pub fn visit_code(visit_name: &str) -> &str {
    VISITS
        .iter()
        .find(|(name, _)| *name == visit_name)
        .map(|(_, code)| *code)
        .unwrap_or(visit_name)
}

/// Stable code for a document-type name (`Dosage des β HCG` →
/// `dosage_des_beta_hcg`).
pub fn document_code(document_name: &str) -> String {
    document_name
        .to_lowercase()
        .replace(' ', "_")
        .replace('é', "e")
        .replace('β', "beta")
}
