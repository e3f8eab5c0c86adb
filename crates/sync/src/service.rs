//! Remote folder service seam.

use medsync_protocol::{Folder, RemoteError};
use medsync_transfer::BoxFuture;

/// Abstract remote folder service.
///
/// The app implements this on top of the Girder HTTP client; tests use a
/// scripted in-memory tree.
pub trait FolderService: Send + Sync {
    /// First child folder of `parent_id` named exactly `name`.
    fn find_child_folder<'a>(
        &'a self,
        parent_id: &'a str,
        name: &'a str,
    ) -> BoxFuture<'a, Result<Option<Folder>, RemoteError>>;

    fn create_folder<'a>(
        &'a self,
        parent_id: &'a str,
        name: &'a str,
        public: bool,
    ) -> BoxFuture<'a, Result<Folder, RemoteError>>;

    /// Fetches a folder by id; a missing folder is a not-found error.
    fn get_folder<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Folder, RemoteError>>;

    /// Sets the folder's visibility without touching its children.
    fn set_access<'a>(
        &'a self,
        id: &'a str,
        public: bool,
    ) -> BoxFuture<'a, Result<Folder, RemoteError>>;

    /// Merges `metadata` into the folder's metadata.
    fn set_metadata<'a>(
        &'a self,
        id: &'a str,
        metadata: &'a serde_json::Value,
    ) -> BoxFuture<'a, Result<Folder, RemoteError>>;
}
