//! Bridges the Girder HTTP client to the `FolderService` and `FileService`
//! seams of the sync and transfer crates.

use std::sync::Arc;

use medsync_girder::Client;
use medsync_protocol::{ChunkAck, Folder, RemoteError, UploadHandle};
use medsync_sync::FolderService;
use medsync_transfer::{BoxFuture, FileService};

/// Implements both remote seams over one shared client.
#[derive(Clone)]
pub struct GirderRemote {
    client: Arc<Client>,
}

impl GirderRemote {
    pub fn new(client: Client) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

impl FolderService for GirderRemote {
    fn find_child_folder<'a>(
        &'a self,
        parent_id: &'a str,
        name: &'a str,
    ) -> BoxFuture<'a, Result<Option<Folder>, RemoteError>> {
        Box::pin(async move {
            self.client
                .find_folder(parent_id, name)
                .await
                .map_err(RemoteError::from)
        })
    }

    fn create_folder<'a>(
        &'a self,
        parent_id: &'a str,
        name: &'a str,
        public: bool,
    ) -> BoxFuture<'a, Result<Folder, RemoteError>> {
        Box::pin(async move {
            self.client
                .create_folder(parent_id, name, public)
                .await
                .map_err(RemoteError::from)
        })
    }

    fn get_folder<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Folder, RemoteError>> {
        Box::pin(async move { self.client.get_folder(id).await.map_err(RemoteError::from) })
    }

    fn set_access<'a>(
        &'a self,
        id: &'a str,
        public: bool,
    ) -> BoxFuture<'a, Result<Folder, RemoteError>> {
        Box::pin(async move {
            self.client
                .set_folder_access(id, public)
                .await
                .map_err(RemoteError::from)
        })
    }

    fn set_metadata<'a>(
        &'a self,
        id: &'a str,
        metadata: &'a serde_json::Value,
    ) -> BoxFuture<'a, Result<Folder, RemoteError>> {
        Box::pin(async move {
            self.client
                .set_folder_metadata(id, metadata)
                .await
                .map_err(RemoteError::from)
        })
    }
}

impl FileService for GirderRemote {
    fn init_upload<'a>(
        &'a self,
        folder_id: &'a str,
        name: &'a str,
        size: u64,
        mime_type: &'a str,
    ) -> BoxFuture<'a, Result<UploadHandle, RemoteError>> {
        Box::pin(async move {
            self.client
                .init_upload(folder_id, name, size, mime_type)
                .await
                .map_err(RemoteError::from)
        })
    }

    fn send_chunk<'a>(
        &'a self,
        upload_id: &'a str,
        offset: u64,
        data: &'a [u8],
    ) -> BoxFuture<'a, Result<ChunkAck, RemoteError>> {
        Box::pin(async move {
            self.client
                .upload_chunk(upload_id, offset, data.to_vec())
                .await
                .map_err(RemoteError::from)
        })
    }

    fn finalize_upload<'a>(
        &'a self,
        upload_id: &'a str,
    ) -> BoxFuture<'a, Result<ChunkAck, RemoteError>> {
        Box::pin(async move {
            self.client
                .finalize_upload(upload_id)
                .await
                .map_err(RemoteError::from)
        })
    }
}
