//! Remote file service seam.

use std::future::Future;
use std::pin::Pin;

use medsync_protocol::{ChunkAck, RemoteError, UploadHandle};

/// Boxed future returned by remote-service traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Abstract remote file service.
///
/// The app implements this on top of the Girder HTTP client. Keeping it a
/// trait lets the upload protocol be tested against scripted servers.
pub trait FileService: Send + Sync {
    /// Opens an upload session for `size` bytes named `name` in `folder_id`.
    fn init_upload<'a>(
        &'a self,
        folder_id: &'a str,
        name: &'a str,
        size: u64,
        mime_type: &'a str,
    ) -> BoxFuture<'a, Result<UploadHandle, RemoteError>>;

    /// Sends `data` at byte `offset` of the upload.
    fn send_chunk<'a>(
        &'a self,
        upload_id: &'a str,
        offset: u64,
        data: &'a [u8],
    ) -> BoxFuture<'a, Result<ChunkAck, RemoteError>>;

    /// Asks for the finished file document of an upload whose bytes were
    /// all sent.
    fn finalize_upload<'a>(&'a self, upload_id: &'a str)
    -> BoxFuture<'a, Result<ChunkAck, RemoteError>>;
}
