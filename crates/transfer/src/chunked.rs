use std::io::Read;
use std::path::Path;

use medsync_protocol::ChunkAck;
use tracing::{debug, info, warn};

use crate::mime::mime_type_for;
use crate::service::FileService;
use crate::types::{UploadOptions, UploadSession, UploadedFile};
use crate::TransferError;

/// Pushes one payload to the remote file service in fixed-size chunks.
///
/// Uploads are sequential: one chunk in flight, one file at a time. A
/// failure anywhere aborts the upload; the next attempt starts from
/// offset 0.
pub struct ChunkedUploader<'a> {
    files: &'a dyn FileService,
    options: UploadOptions,
}

impl<'a> ChunkedUploader<'a> {
    pub fn new(files: &'a dyn FileService, options: UploadOptions) -> Self {
        Self { files, options }
    }

    pub fn options(&self) -> &UploadOptions {
        &self.options
    }

    /// Uploads a local file under its own name (or `file_name` if given).
    pub async fn upload_path(
        &self,
        path: &Path,
        folder_id: &str,
        file_name: Option<&str>,
    ) -> Result<UploadedFile, TransferError> {
        let name = match file_name {
            Some(name) => name.to_string(),
            None => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| TransferError::InvalidPath(path.display().to_string()))?,
        };
        let data = tokio::fs::read(path).await?;
        self.upload(&data, folder_id, &name).await
    }

    /// Drains `reader` into memory, then uploads it.
    pub async fn upload_reader<R: Read>(
        &self,
        mut reader: R,
        folder_id: &str,
        file_name: &str,
    ) -> Result<UploadedFile, TransferError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        self.upload(&data, folder_id, file_name).await
    }

    /// Uploads `data` as `file_name` into `folder_id`.
    pub async fn upload(
        &self,
        data: &[u8],
        folder_id: &str,
        file_name: &str,
    ) -> Result<UploadedFile, TransferError> {
        let total = data.len() as u64;
        let mime_type = mime_type_for(file_name);

        let handle = self
            .files
            .init_upload(folder_id, file_name, total, mime_type)
            .await
            .map_err(|e| TransferError::remote(file_name, e))?;
        let mut session = UploadSession::new(handle.id, folder_id, file_name, mime_type, total);
        debug!(
            file = file_name,
            upload_id = %session.remote_upload_id,
            size = total,
            mime = mime_type,
            "upload session opened"
        );

        let ack = self.send_chunks(data, &mut session).await?;
        if !session.is_complete() {
            return Err(self.incomplete(&session));
        }

        let file = match ack.terminal_file() {
            Some(file) => file.clone(),
            None => {
                debug!(file = file_name, "final chunk carried no file document, finalizing");
                if !self.options.finalize_wait.is_zero() {
                    tokio::time::sleep(self.options.finalize_wait).await;
                }
                let ack = self
                    .files
                    .finalize_upload(&session.remote_upload_id)
                    .await
                    .map_err(|e| TransferError::remote(file_name, e))?;
                ack.terminal_file()
                    .cloned()
                    .ok_or_else(|| self.incomplete(&session))?
            }
        };

        let remote_size = file.size.unwrap_or_default();
        if remote_size != total {
            if self.options.strict_size {
                return Err(TransferError::SizeMismatch {
                    file_name: file_name.to_string(),
                    expected: total,
                    actual: remote_size,
                });
            }
            warn!(
                file = file_name,
                expected = total,
                actual = remote_size,
                "remote size differs from local payload"
            );
        }

        info!(file = file_name, file_id = %file.id, size = remote_size, "upload complete");
        Ok(UploadedFile {
            file_id: file.id,
            name: file_name.to_string(),
            size: remote_size,
            mime_type: mime_type.to_string(),
        })
    }

    /// Runs the chunk loop and returns the last acknowledgement.
    ///
    /// At least one chunk is always sent, so an empty payload still
    /// reaches the server.
    async fn send_chunks(
        &self,
        data: &[u8],
        session: &mut UploadSession,
    ) -> Result<ChunkAck, TransferError> {
        let total = session.total_size;
        let chunk_size = self.options.chunk_size.max(1) as u64;
        let mut offset = 0u64;

        loop {
            let end = offset.saturating_add(chunk_size).min(total);
            let chunk = &data[offset as usize..end as usize];
            let ack = self
                .files
                .send_chunk(&session.remote_upload_id, offset, chunk)
                .await
                .map_err(|e| TransferError::remote(&session.file_name, e))?;
            let next = session.add_progress(ack.received, chunk.len());

            if next >= total {
                return Ok(ack);
            }
            if next <= offset {
                warn!(
                    file = %session.file_name,
                    offset,
                    received = next,
                    "server stopped acknowledging bytes"
                );
                return Ok(ack);
            }

            offset = next;
            info!(
                file = %session.file_name,
                offset,
                total,
                percent = session.percent(),
                "chunk acknowledged"
            );
            if !self.options.pacing.is_zero() {
                tokio::time::sleep(self.options.pacing).await;
            }
        }
    }

    fn incomplete(&self, session: &UploadSession) -> TransferError {
        TransferError::Incomplete {
            file_name: session.file_name.clone(),
            last_offset: session.bytes_transferred,
            expected: session.total_size,
        }
    }
}
