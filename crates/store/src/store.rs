use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use medsync_protocol::{FolderLevel, NewFileRecord, PathKey, SyncRecord};
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::schema::{
    DEMO_CENTERS, DEMO_PATIENTS_PER_CENTER, SCHEMA, VISITS, demo_documents, document_code,
    visit_code,
};
use crate::structure::{CenterNode, TREE_SELECT, TreeRow, build_tree};

const RECORD_SELECT: &str = "
SELECT f.id, c.code, p.patient_id, v.visit_name, dt.document_name,
       f.filename, f.file_path, f.file_size, f.mime_type, f.girder_file_id,
       f.synced_to_girder, f.uploaded_at
FROM files f
JOIN document_types dt ON f.document_type_id = dt.id
JOIN visits v ON dt.visit_id = v.id
JOIN patients p ON v.patient_id = p.id
JOIN centers c ON p.center_id = c.id";

/// Handle to the local SQLite database.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Opens (or creates) the database at `path` and applies the schema.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        info!(path = %path.display(), "store opened");
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Fills an empty store with the demo centers, patients, visits and
    /// document types. Returns `false` if centers already exist.
    pub fn seed_demo_structure(&self) -> Result<bool, StoreError> {
        let mut conn = self.conn()?;
        let existing: i64 = conn.query_row("SELECT COUNT(*) FROM centers", [], |r| r.get(0))?;
        if existing > 0 {
            debug!(centers = existing, "store already seeded");
            return Ok(false);
        }

        let tx = conn.transaction()?;
        for (code, name) in DEMO_CENTERS {
            tx.execute(
                "INSERT INTO centers (code, name) VALUES (?1, ?2)",
                params![code, name],
            )?;
            let center_id = tx.last_insert_rowid();

            for n in 1..=DEMO_PATIENTS_PER_CENTER {
                tx.execute(
                    "INSERT INTO patients (center_id, patient_id) VALUES (?1, ?2)",
                    params![center_id, format!("Patient_{n:03}")],
                )?;
                let patient_id = tx.last_insert_rowid();

                for (visit_name, vcode) in VISITS {
                    tx.execute(
                        "INSERT INTO visits (patient_id, visit_name, visit_code) VALUES (?1, ?2, ?3)",
                        params![patient_id, visit_name, vcode],
                    )?;
                    let visit_id = tx.last_insert_rowid();

                    for doc in demo_documents(vcode) {
                        tx.execute(
                            "INSERT INTO document_types (visit_id, document_name, document_code)
                             VALUES (?1, ?2, ?3)",
                            params![visit_id, doc, document_code(doc)],
                        )?;
                    }
                }
            }
        }
        tx.commit()?;

        info!(centers = DEMO_CENTERS.len(), "demo structure seeded");
        Ok(true)
    }

    /// Inserts whatever rows are missing along `key` and returns the
    /// document-type row id.
    pub fn ensure_path(&self, key: &PathKey) -> Result<i64, StoreError> {
        let conn = self.conn()?;
        let ids = ensure_rows(&conn, key, FolderLevel::Document)?;
        Ok(ids[FolderLevel::Document.depth() - 1])
    }

    /// Remote folder id cached for `key` at `level`, if any.
    pub fn cached_folder_id(
        &self,
        key: &PathKey,
        level: FolderLevel,
    ) -> Result<Option<String>, StoreError> {
        let conn = self.conn()?;
        let sql = match level {
            FolderLevel::Center => "SELECT girder_folder_id FROM centers WHERE code = ?1",
            FolderLevel::Patient => {
                "SELECT p.girder_folder_id FROM patients p
                 JOIN centers c ON p.center_id = c.id
                 WHERE c.code = ?1 AND p.patient_id = ?2"
            }
            FolderLevel::Visit => {
                "SELECT v.girder_folder_id FROM visits v
                 JOIN patients p ON v.patient_id = p.id
                 JOIN centers c ON p.center_id = c.id
                 WHERE c.code = ?1 AND p.patient_id = ?2 AND v.visit_name = ?3"
            }
            FolderLevel::Document => {
                "SELECT dt.girder_folder_id FROM document_types dt
                 JOIN visits v ON dt.visit_id = v.id
                 JOIN patients p ON v.patient_id = p.id
                 JOIN centers c ON p.center_id = c.id
                 WHERE c.code = ?1 AND p.patient_id = ?2 AND v.visit_name = ?3
                   AND dt.document_name = ?4"
            }
        };
        let id = conn
            .query_row(sql, params_from_iter(raw_segments(key, level)), |r| {
                r.get::<_, Option<String>>(0)
            })
            .optional()?
            .flatten();
        Ok(id)
    }

    /// Caches `folder_id` for `key` at `level`, creating local rows down to
    /// that level if needed.
    pub fn save_folder_id(
        &self,
        key: &PathKey,
        level: FolderLevel,
        folder_id: &str,
    ) -> Result<(), StoreError> {
        let conn = self.conn()?;
        let ids = ensure_rows(&conn, key, level)?;
        let row_id = ids[level.depth() - 1];
        let sql = match level {
            FolderLevel::Center => "UPDATE centers SET girder_folder_id = ?1 WHERE id = ?2",
            FolderLevel::Patient => "UPDATE patients SET girder_folder_id = ?1 WHERE id = ?2",
            FolderLevel::Visit => "UPDATE visits SET girder_folder_id = ?1 WHERE id = ?2",
            FolderLevel::Document => {
                "UPDATE document_types SET girder_folder_id = ?1 WHERE id = ?2"
            }
        };
        conn.execute(sql, params![folder_id, row_id])?;
        debug!(path = %key, %level, folder_id, "folder id cached");
        Ok(())
    }

    /// Every document-type path in the store, in insertion order.
    pub fn document_paths(&self) -> Result<Vec<PathKey>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT c.code, p.patient_id, v.visit_name, dt.document_name
             FROM document_types dt
             JOIN visits v ON dt.visit_id = v.id
             JOIN patients p ON v.patient_id = p.id
             JOIN centers c ON p.center_id = c.id
             ORDER BY c.id, p.id, v.id, dt.id",
        )?;
        let paths = stmt
            .query_map([], |r| {
                Ok(PathKey::new(
                    r.get::<_, String>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(paths)
    }

    /// Records an ingested file as pending sync.
    pub fn create_file_record(&self, new: &NewFileRecord) -> Result<SyncRecord, StoreError> {
        let id = {
            let conn = self.conn()?;
            let document_type_id = ensure_rows(&conn, &new.path, FolderLevel::Document)?[3];
            conn.execute(
                "INSERT INTO files
                    (document_type_id, filename, file_path, file_size, mime_type, uploaded_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    document_type_id,
                    new.file_name,
                    new.disk_location.to_string_lossy().into_owned(),
                    new.size as i64,
                    new.mime_type,
                    Utc::now(),
                ],
            )?;
            conn.last_insert_rowid()
        };
        debug!(record = id, file = %new.file_name, path = %new.path, "file record created");
        self.record(id)
    }

    pub fn record(&self, id: i64) -> Result<SyncRecord, StoreError> {
        let conn = self.conn()?;
        conn.query_row(&format!("{RECORD_SELECT} WHERE f.id = ?1"), [id], map_record)
            .optional()?
            .ok_or(StoreError::RecordNotFound(id))
    }

    /// Records not yet uploaded, oldest first.
    pub fn unsynced_records(&self) -> Result<Vec<SyncRecord>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "{RECORD_SELECT} WHERE f.synced_to_girder = 0 ORDER BY f.uploaded_at, f.id"
        ))?;
        let records = stmt
            .query_map([], map_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    pub fn unsynced_count(&self) -> Result<usize, StoreError> {
        let conn = self.conn()?;
        let n: i64 = conn.query_row(
            "SELECT COUNT(*) FROM files WHERE synced_to_girder = 0",
            [],
            |r| r.get(0),
        )?;
        Ok(n as usize)
    }

    /// Returns `(total, synced)` file counts.
    pub fn file_counts(&self) -> Result<(usize, usize), StoreError> {
        let conn = self.conn()?;
        let (total, synced): (i64, i64) = conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(synced_to_girder), 0) FROM files",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )?;
        Ok((total as usize, synced as usize))
    }

    /// The whole local tree with per-document file counts.
    pub fn structure(&self) -> Result<Vec<CenterNode>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(TREE_SELECT)?;
        let rows = stmt
            .query_map([], |r| {
                let patient = r
                    .get::<_, Option<String>>(3)?
                    .map(|id| -> rusqlite::Result<(String, Option<String>)> { Ok((id, r.get(4)?)) })
                    .transpose()?;
                let visit = r
                    .get::<_, Option<String>>(5)?
                    .map(|name| -> rusqlite::Result<(String, String, Option<String>)> {
                        Ok((name, r.get(6)?, r.get(7)?))
                    })
                    .transpose()?;
                let document = r
                    .get::<_, Option<String>>(8)?
                    .map(|name| -> rusqlite::Result<(String, String, Option<String>)> {
                        Ok((name, r.get(9)?, r.get(10)?))
                    })
                    .transpose()?;
                Ok(TreeRow {
                    center: (r.get(0)?, r.get(1)?, r.get(2)?),
                    patient,
                    visit,
                    document,
                    file_count: r.get::<_, i64>(11)? as usize,
                    synced_count: r.get::<_, i64>(12)? as usize,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(build_tree(rows))
    }

    /// Files ingested under `key`, oldest first. Empty if the path is
    /// unknown.
    pub fn files_for(&self, key: &PathKey) -> Result<Vec<SyncRecord>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "{RECORD_SELECT}
             WHERE c.code = ?1 AND p.patient_id = ?2 AND v.visit_name = ?3
               AND dt.document_name = ?4
             ORDER BY f.uploaded_at, f.id"
        ))?;
        let records = stmt
            .query_map(
                params![key.center_code, key.patient_id, key.visit_name, key.document_name],
                map_record,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Marks a record as uploaded under `remote_file_id`.
    pub fn mark_synced(&self, id: i64, remote_file_id: &str) -> Result<(), StoreError> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE files SET synced_to_girder = 1, girder_file_id = ?1 WHERE id = ?2",
            params![remote_file_id, id],
        )?;
        if changed == 0 {
            return Err(StoreError::RecordNotFound(id));
        }
        debug!(record = id, file_id = remote_file_id, "record marked synced");
        Ok(())
    }
}

/// Raw names of `key` down to `level` (the center as its code, not its
/// remote folder name).
fn raw_segments(key: &PathKey, level: FolderLevel) -> Vec<&str> {
    let all = [
        key.center_code.as_str(),
        key.patient_id.as_str(),
        key.visit_name.as_str(),
        key.document_name.as_str(),
    ];
    all[..level.depth()].to_vec()
}

/// Makes sure rows exist from the center down to `level`; returns their
/// ids root first.
fn ensure_rows(
    conn: &Connection,
    key: &PathKey,
    level: FolderLevel,
) -> Result<Vec<i64>, StoreError> {
    let mut ids = Vec::with_capacity(level.depth());

    conn.execute(
        "INSERT OR IGNORE INTO centers (code, name) VALUES (?1, ?2)",
        params![key.center_code, format!("CHU {}", key.center_code)],
    )?;
    let center_id: i64 = conn.query_row(
        "SELECT id FROM centers WHERE code = ?1",
        [&key.center_code],
        |r| r.get(0),
    )?;
    ids.push(center_id);
    if level == FolderLevel::Center {
        return Ok(ids);
    }

    conn.execute(
        "INSERT OR IGNORE INTO patients (center_id, patient_id) VALUES (?1, ?2)",
        params![center_id, key.patient_id],
    )?;
    let patient_id: i64 = conn.query_row(
        "SELECT id FROM patients WHERE center_id = ?1 AND patient_id = ?2",
        params![center_id, key.patient_id],
        |r| r.get(0),
    )?;
    ids.push(patient_id);
    if level == FolderLevel::Patient {
        return Ok(ids);
    }

    let visit_id = find_or_insert(
        conn,
        "SELECT id FROM visits WHERE patient_id = ?1 AND visit_name = ?2",
        params![patient_id, key.visit_name],
        "INSERT INTO visits (patient_id, visit_name, visit_code) VALUES (?1, ?2, ?3)",
        params![patient_id, key.visit_name, visit_code(&key.visit_name)],
    )?;
    ids.push(visit_id);
    if level == FolderLevel::Visit {
        return Ok(ids);
    }

    let document_id = find_or_insert(
        conn,
        "SELECT id FROM document_types WHERE visit_id = ?1 AND document_name = ?2",
        params![visit_id, key.document_name],
        "INSERT INTO document_types (visit_id, document_name, document_code) VALUES (?1, ?2, ?3)",
        params![visit_id, key.document_name, document_code(&key.document_name)],
    )?;
    ids.push(document_id);
    Ok(ids)
}

fn find_or_insert(
    conn: &Connection,
    select: &str,
    select_params: &[&dyn rusqlite::ToSql],
    insert: &str,
    insert_params: &[&dyn rusqlite::ToSql],
) -> Result<i64, StoreError> {
    if let Some(id) = conn
        .query_row(select, select_params, |r| r.get(0))
        .optional()?
    {
        return Ok(id);
    }
    conn.execute(insert, insert_params)?;
    Ok(conn.last_insert_rowid())
}

fn map_record(row: &Row<'_>) -> rusqlite::Result<SyncRecord> {
    Ok(SyncRecord {
        id: row.get(0)?,
        path: PathKey::new(
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
        ),
        file_name: row.get(5)?,
        disk_location: PathBuf::from(row.get::<_, String>(6)?),
        size: row.get::<_, Option<i64>>(7)?.unwrap_or_default().max(0) as u64,
        mime_type: row.get(8)?,
        remote_file_id: row.get(9)?,
        synced: row.get(10)?,
        uploaded_at: row.get(11)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(doc: &str) -> PathKey {
        PathKey::new("Bordeaux", "Patient_001", "Inclusion M0", doc)
    }

    fn new_record(path: PathKey, name: &str, size: u64) -> NewFileRecord {
        NewFileRecord {
            path,
            file_name: name.into(),
            disk_location: PathBuf::from(format!("uploads/{name}")),
            size,
            mime_type: Some("application/dicom".into()),
        }
    }

    #[test]
    fn schema_applies_twice_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("medsync.db");
        {
            let store = Store::open(&path).unwrap();
            store.ensure_path(&key("Bilan Biologique")).unwrap();
        }
        let store = Store::open(&path).unwrap();
        assert_eq!(store.document_paths().unwrap().len(), 1);
    }

    #[test]
    fn seed_builds_demo_tree_once() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.seed_demo_structure().unwrap());
        assert!(!store.seed_demo_structure().unwrap());

        let paths = store.document_paths().unwrap();
        // 3 centers x 2 patients x (3 + 4 + 3 + 3) document types.
        assert_eq!(paths.len(), 78);
        assert_eq!(paths[0], key("Bilan Biologique"));
        assert!(paths.contains(&PathKey::new(
            "Toulouse",
            "Patient_002",
            "Preinclusion M-6",
            "ECG 12 derivations"
        )));
        assert!(!paths.contains(&PathKey::new(
            "Paris",
            "Patient_001",
            "Visite M12",
            "ECG 12 derivations"
        )));
    }

    #[test]
    fn ensure_path_is_idempotent() {
        let store = Store::open_in_memory().unwrap();
        let a = store.ensure_path(&key("Bilan Biologique")).unwrap();
        let b = store.ensure_path(&key("Bilan Biologique")).unwrap();
        let c = store.ensure_path(&key("Dosage des β HCG")).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(store.document_paths().unwrap().len(), 2);
    }

    #[test]
    fn folder_ids_cached_per_level() {
        let store = Store::open_in_memory().unwrap();
        let k = key("Bilan Biologique");

        for level in FolderLevel::ALL {
            assert_eq!(store.cached_folder_id(&k, level).unwrap(), None);
        }

        store.save_folder_id(&k, FolderLevel::Center, "c1").unwrap();
        store.save_folder_id(&k, FolderLevel::Patient, "p1").unwrap();
        store.save_folder_id(&k, FolderLevel::Visit, "v1").unwrap();
        store.save_folder_id(&k, FolderLevel::Document, "d1").unwrap();

        assert_eq!(store.cached_folder_id(&k, FolderLevel::Center).unwrap().as_deref(), Some("c1"));
        assert_eq!(store.cached_folder_id(&k, FolderLevel::Patient).unwrap().as_deref(), Some("p1"));
        assert_eq!(store.cached_folder_id(&k, FolderLevel::Visit).unwrap().as_deref(), Some("v1"));
        assert_eq!(store.cached_folder_id(&k, FolderLevel::Document).unwrap().as_deref(), Some("d1"));

        // Sibling document shares ancestors but not the leaf.
        let sibling = key("Consentement_Eclaire");
        assert_eq!(store.cached_folder_id(&sibling, FolderLevel::Visit).unwrap().as_deref(), Some("v1"));
        assert_eq!(store.cached_folder_id(&sibling, FolderLevel::Document).unwrap(), None);

        store.save_folder_id(&k, FolderLevel::Document, "d2").unwrap();
        assert_eq!(store.cached_folder_id(&k, FolderLevel::Document).unwrap().as_deref(), Some("d2"));
    }

    #[test]
    fn saving_patient_level_does_not_create_documents() {
        let store = Store::open_in_memory().unwrap();
        let k = PathKey::new("Lyon", "Patient_042", "", "");
        store.save_folder_id(&k, FolderLevel::Patient, "p42").unwrap();

        assert_eq!(store.cached_folder_id(&k, FolderLevel::Patient).unwrap().as_deref(), Some("p42"));
        assert!(store.document_paths().unwrap().is_empty());
    }

    #[test]
    fn file_records_lifecycle() {
        let store = Store::open_in_memory().unwrap();
        let first = store
            .create_file_record(&new_record(key("Bilan Biologique"), "IMG1.dcm", 2048))
            .unwrap();
        let second = store
            .create_file_record(&new_record(key("Consentement_Eclaire"), "consent.pdf", 10))
            .unwrap();

        assert!(!first.synced);
        assert_eq!(first.size, 2048);
        assert_eq!(first.path, key("Bilan Biologique"));
        assert_eq!(first.disk_location, PathBuf::from("uploads/IMG1.dcm"));
        assert_eq!(store.unsynced_count().unwrap(), 2);

        let pending: Vec<i64> = store.unsynced_records().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(pending, vec![first.id, second.id]);

        store.mark_synced(first.id, "file-abc").unwrap();
        let synced = store.record(first.id).unwrap();
        assert!(synced.synced);
        assert_eq!(synced.remote_file_id.as_deref(), Some("file-abc"));
        assert_eq!(store.unsynced_count().unwrap(), 1);
        assert_eq!(store.file_counts().unwrap(), (2, 1));
    }

    #[test]
    fn unknown_record() {
        let store = Store::open_in_memory().unwrap();
        assert!(matches!(store.record(99), Err(StoreError::RecordNotFound(99))));
        assert!(matches!(
            store.mark_synced(99, "x"),
            Err(StoreError::RecordNotFound(99))
        ));
        assert_eq!(store.file_counts().unwrap(), (0, 0));
    }

    #[test]
    fn case_distinct_siblings_are_separate_rows() {
        let store = Store::open_in_memory().unwrap();
        let upper = store.ensure_path(&key("Bilan Biologique")).unwrap();
        store
            .save_folder_id(&key("bilan biologique"), FolderLevel::Document, "d-b")
            .unwrap();
        let lower = store.ensure_path(&key("bilan biologique")).unwrap();
        assert_ne!(upper, lower);
        assert_eq!(
            store
                .cached_folder_id(&key("Bilan Biologique"), FolderLevel::Document)
                .unwrap(),
            None
        );

        // "M12" and "Visite M12" share a visit code but are distinct visits.
        let short = PathKey::new("Bordeaux", "Patient_001", "M12", "ECG");
        let long = PathKey::new("Bordeaux", "Patient_001", "Visite M12", "ECG");
        store.ensure_path(&long).unwrap();
        store.save_folder_id(&short, FolderLevel::Visit, "v-short").unwrap();
        assert_eq!(store.cached_folder_id(&long, FolderLevel::Visit).unwrap(), None);
        assert_eq!(store.document_paths().unwrap().len(), 3);
    }

    #[test]
    fn structure_nests_levels_with_counts() {
        let store = Store::open_in_memory().unwrap();
        store.seed_demo_structure().unwrap();
        let a = store
            .create_file_record(&new_record(key("Bilan Biologique"), "a.dcm", 10))
            .unwrap();
        store
            .create_file_record(&new_record(key("Bilan Biologique"), "b.dcm", 20))
            .unwrap();
        store.mark_synced(a.id, "file-a").unwrap();
        store
            .save_folder_id(&key("Bilan Biologique"), FolderLevel::Center, "c-bdx")
            .unwrap();

        let tree = store.structure().unwrap();
        assert_eq!(tree.len(), 3);
        let bordeaux = &tree[0];
        assert_eq!(bordeaux.code, "Bordeaux");
        assert_eq!(bordeaux.folder_id.as_deref(), Some("c-bdx"));
        assert_eq!(bordeaux.patients.len(), 2);

        let inclusion = &bordeaux.patients[0].visits[0];
        assert_eq!(inclusion.name, "Inclusion M0");
        assert_eq!(inclusion.code, "M0");
        assert_eq!(inclusion.documents.len(), 3);
        let bilan = &inclusion.documents[0];
        assert_eq!(bilan.name, "Bilan Biologique");
        assert_eq!((bilan.file_count, bilan.synced_count), (2, 1));
        assert_eq!(bilan.pending_count(), 1);

        let preinclusion = &bordeaux.patients[0].visits[1];
        assert_eq!(preinclusion.documents.len(), 4);
        assert_eq!(tree[2].patients[1].patient_id, "Patient_002");
    }

    #[test]
    fn structure_keeps_childless_nodes() {
        let store = Store::open_in_memory().unwrap();
        store
            .save_folder_id(&key("Bilan Biologique"), FolderLevel::Patient, "p1")
            .unwrap();

        let tree = store.structure().unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].name, "CHU Bordeaux");
        assert_eq!(tree[0].patients[0].folder_id.as_deref(), Some("p1"));
        assert!(tree[0].patients[0].visits.is_empty());
    }

    #[test]
    fn files_for_lists_one_document() {
        let store = Store::open_in_memory().unwrap();
        store
            .create_file_record(&new_record(key("Bilan Biologique"), "a.dcm", 10))
            .unwrap();
        store
            .create_file_record(&new_record(key("Dosage des β HCG"), "b.pdf", 20))
            .unwrap();

        let files = store.files_for(&key("Bilan Biologique")).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name, "a.dcm");
        assert!(store.files_for(&key("Unknown")).unwrap().is_empty());
    }
}
