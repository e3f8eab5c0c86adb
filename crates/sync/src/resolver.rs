//! Idempotent four-level folder resolution.
//!
//! Walks Center → Patient → Visit → Document under a root folder. At each
//! level a cached id is tried first (and verified remotely), then a lookup
//! by name, then creation. Every id found or created is written through to
//! the local store before descending.

use medsync_protocol::{FolderLevel, PathKey, RemoteError};
use medsync_store::Store;
use tracing::{debug, error, info, warn};

use crate::error::SyncError;
use crate::service::FolderService;

/// Resolves a [`PathKey`] to a remote folder id.
///
/// Assumes a single writer: creation is not transactional and concurrent
/// resolvers can race to create the same folder.
pub struct FolderResolver<'a> {
    folders: &'a dyn FolderService,
    store: &'a Store,
    public: bool,
    create_missing: bool,
}

impl<'a> FolderResolver<'a> {
    /// Creates a resolver that creates missing folders as public.
    pub fn new(folders: &'a dyn FolderService, store: &'a Store) -> Self {
        Self {
            folders,
            store,
            public: true,
            create_missing: true,
        }
    }

    /// Visibility applied to every folder found or created.
    pub fn public(mut self, public: bool) -> Self {
        self.public = public;
        self
    }

    /// When `false`, a missing folder is a structure error instead of
    /// being created.
    pub fn create_missing(mut self, create_missing: bool) -> Self {
        self.create_missing = create_missing;
        self
    }

    /// Returns the document-level folder id for `key` under `root_id`.
    pub async fn resolve_folder(&self, key: &PathKey, root_id: &str) -> Result<String, SyncError> {
        self.resolve_to(key, FolderLevel::Document, root_id).await
    }

    /// Returns the folder id for `key` down to `level` only.
    pub async fn resolve_to(
        &self,
        key: &PathKey,
        level: FolderLevel,
        root_id: &str,
    ) -> Result<String, SyncError> {
        let mut parent_id = root_id.to_string();
        for &current in level.path_to() {
            parent_id = match self.resolve_level(key, current, &parent_id).await {
                Ok(id) => id,
                Err(e) => {
                    error!(path = %key, level = %current, error = %e, "folder resolution failed");
                    return Err(e);
                }
            };
        }
        Ok(parent_id)
    }

    async fn resolve_level(
        &self,
        key: &PathKey,
        level: FolderLevel,
        parent_id: &str,
    ) -> Result<String, SyncError> {
        let name = key.folder_name(level);

        if let Some(cached) = self.store.cached_folder_id(key, level)? {
            match self.folders.get_folder(&cached).await {
                Ok(folder) if folder.parent_id.as_deref().is_none_or(|p| p == parent_id) => {
                    debug!(%level, name = %name, folder_id = %cached, "cached folder verified");
                    return Ok(cached);
                }
                Ok(folder) => {
                    warn!(
                        %level,
                        name = %name,
                        folder_id = %cached,
                        cached_parent = folder.parent_id.as_deref().unwrap_or_default(),
                        parent_id,
                        "cached folder belongs to another parent"
                    );
                }
                Err(e) => {
                    warn!(
                        %level,
                        name = %name,
                        folder_id = %cached,
                        error = %e,
                        "cached folder id is stale"
                    );
                }
            }
        }

        let found = self
            .folders
            .find_child_folder(parent_id, &name)
            .await
            .map_err(|source| remote_access(level, &name, source))?;

        let folder = match found {
            Some(folder) => {
                debug!(%level, name = %name, folder_id = %folder.id, "folder found");
                folder
            }
            None if self.create_missing => {
                let folder = self
                    .folders
                    .create_folder(parent_id, &name, self.public)
                    .await
                    .map_err(|source| remote_access(level, &name, source))?;
                info!(%level, name = %name, folder_id = %folder.id, parent_id, "folder created");
                folder
            }
            None => {
                return Err(SyncError::MissingFolder {
                    level,
                    name,
                    parent_id: parent_id.to_string(),
                });
            }
        };

        if let Err(e) = self.folders.set_access(&folder.id, self.public).await {
            warn!(%level, folder_id = %folder.id, error = %e, "could not set folder access");
        }

        self.store.save_folder_id(key, level, &folder.id)?;
        Ok(folder.id)
    }
}

fn remote_access(level: FolderLevel, name: &str, source: RemoteError) -> SyncError {
    SyncError::RemoteAccess {
        level,
        name: name.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::mock::MockFolders;

    const ROOT: &str = "root";

    fn key() -> PathKey {
        PathKey::new("Bordeaux", "Patient_001", "Inclusion M0", "Bilan Biologique")
    }

    #[tokio::test]
    async fn creates_full_chain_under_root() {
        let folders = MockFolders::new(ROOT);
        let store = Store::open_in_memory().unwrap();
        let resolver = FolderResolver::new(&folders, &store);

        let id = resolver.resolve_folder(&key(), ROOT).await.unwrap();

        assert_eq!(folders.create_count(), 4);
        assert_eq!(
            folders.path_of(&id),
            vec!["CHU_Bordeaux", "Patient_001", "Inclusion M0", "Bilan Biologique"]
        );
        assert_eq!(
            store.cached_folder_id(&key(), FolderLevel::Document).unwrap(),
            Some(id)
        );
        assert_eq!(folders.access_calls.lock().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn second_resolution_creates_nothing() {
        let folders = MockFolders::new(ROOT);
        let store = Store::open_in_memory().unwrap();
        let resolver = FolderResolver::new(&folders, &store);

        let first = resolver.resolve_folder(&key(), ROOT).await.unwrap();
        let creates = folders.create_count();
        let second = resolver.resolve_folder(&key(), ROOT).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(folders.create_count(), creates);
    }

    #[tokio::test]
    async fn reuses_existing_remote_folders() {
        let folders = MockFolders::new(ROOT);
        let center = folders.insert(ROOT, "CHU_Bordeaux");
        let patient = folders.insert(&center, "Patient_001");
        let store = Store::open_in_memory().unwrap();

        let id = FolderResolver::new(&folders, &store)
            .resolve_folder(&key(), ROOT)
            .await
            .unwrap();

        assert_eq!(folders.create_count(), 2);
        assert_eq!(folders.parent_of(&folders.parent_of(&id).unwrap()), Some(patient));
        assert_eq!(
            store.cached_folder_id(&key(), FolderLevel::Center).unwrap(),
            Some(center)
        );
    }

    #[tokio::test]
    async fn stale_cache_falls_back_to_lookup() {
        let folders = MockFolders::new(ROOT);
        let store = Store::open_in_memory().unwrap();
        store
            .save_folder_id(&key(), FolderLevel::Center, "deleted-long-ago")
            .unwrap();
        let center = folders.insert(ROOT, "CHU_Bordeaux");

        let resolver = FolderResolver::new(&folders, &store);
        let id = resolver
            .resolve_to(&key(), FolderLevel::Center, ROOT)
            .await
            .unwrap();

        assert_eq!(id, center);
        assert_eq!(folders.create_count(), 0);
        assert_eq!(
            store.cached_folder_id(&key(), FolderLevel::Center).unwrap(),
            Some(center)
        );
    }

    #[tokio::test]
    async fn missing_folder_without_creation_names_level() {
        let folders = MockFolders::new(ROOT);
        let center = folders.insert(ROOT, "CHU_Bordeaux");
        folders.insert(&center, "Patient_001");
        let store = Store::open_in_memory().unwrap();

        let err = FolderResolver::new(&folders, &store)
            .create_missing(false)
            .resolve_folder(&key(), ROOT)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Structure);
        assert_eq!(err.level(), Some(FolderLevel::Visit));
        assert!(err.to_string().contains("visit folder 'Inclusion M0'"));
        assert_eq!(folders.create_count(), 0);
        // Levels above the failure are still cached.
        assert!(store
            .cached_folder_id(&key(), FolderLevel::Patient)
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn access_failure_is_not_fatal() {
        let mut folders = MockFolders::new(ROOT);
        folders.fail_access = true;
        let store = Store::open_in_memory().unwrap();

        let id = FolderResolver::new(&folders, &store)
            .resolve_folder(&key(), ROOT)
            .await;

        assert!(id.is_ok());
    }

    #[tokio::test]
    async fn remote_failure_stops_descent() {
        let mut folders = MockFolders::new(ROOT);
        folders.fail_find_for = Some("Patient_001".into());
        let store = Store::open_in_memory().unwrap();

        let err = FolderResolver::new(&folders, &store)
            .resolve_folder(&key(), ROOT)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::RemoteAccess);
        assert_eq!(err.level(), Some(FolderLevel::Patient));
        // Only the center was created.
        assert_eq!(folders.create_count(), 1);
    }

    #[tokio::test]
    async fn private_visibility_is_applied() {
        let folders = MockFolders::new(ROOT);
        let store = Store::open_in_memory().unwrap();

        FolderResolver::new(&folders, &store)
            .public(false)
            .resolve_to(&key(), FolderLevel::Patient, ROOT)
            .await
            .unwrap();

        let calls = folders.access_calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|(_, public)| !public));
    }

    #[tokio::test]
    async fn cache_from_another_root_is_not_reused() {
        let folders = MockFolders::new("root-a");
        folders.insert_root("root-b");
        let store = Store::open_in_memory().unwrap();
        let resolver = FolderResolver::new(&folders, &store);

        let in_a = resolver.resolve_folder(&key(), "root-a").await.unwrap();
        let in_b = resolver.resolve_folder(&key(), "root-b").await.unwrap();

        assert_ne!(in_a, in_b);
        assert_eq!(folders.create_count(), 8);
        let center_b = folders.child_id("root-b", "CHU_Bordeaux").unwrap();
        assert_eq!(
            store.cached_folder_id(&key(), FolderLevel::Center).unwrap(),
            Some(center_b.clone())
        );
        let mut id = in_b;
        for _ in 0..3 {
            id = folders.parent_of(&id).unwrap();
        }
        assert_eq!(id, center_b);
    }
}
