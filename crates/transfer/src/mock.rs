//! Scripted file service for upload tests.

use std::collections::HashMap;
use std::sync::Mutex;

use medsync_protocol::{ChunkAck, GirderFile, RemoteError, UploadHandle};

use crate::service::{BoxFuture, FileService};

/// Records every call and answers like a Girder server would, with knobs
/// to misbehave.
pub(crate) struct MockFiles {
    /// `(folder_id, name, size, mime_type)` per init call.
    pub inits: Mutex<Vec<(String, String, u64, String)>>,
    /// `(upload_id, offset, len)` per chunk call.
    pub chunks: Mutex<Vec<(String, u64, usize)>>,
    /// `received` values handed back, in order.
    pub acks: Mutex<Vec<u64>>,
    pub finalize_calls: Mutex<usize>,
    /// Report `received` on intermediate chunks.
    pub report_received: bool,
    /// Return the file document from the final chunk.
    pub file_on_final_chunk: bool,
    /// Return the file document from `finalize_upload`.
    pub file_on_finalize: bool,
    /// Never advance `received` past this many bytes.
    pub stall_at: Option<u64>,
    /// Size reported in the file document (defaults to the real size).
    pub reported_size: Option<u64>,
    /// Fail the chunk call with this 1-based index.
    pub fail_chunk: Option<usize>,
    /// Fail `init_upload` for this file name.
    pub fail_init_for: Option<String>,
    sizes: Mutex<HashMap<String, u64>>,
}

impl MockFiles {
    pub fn new() -> Self {
        Self {
            inits: Mutex::new(Vec::new()),
            chunks: Mutex::new(Vec::new()),
            acks: Mutex::new(Vec::new()),
            finalize_calls: Mutex::new(0),
            report_received: true,
            file_on_final_chunk: true,
            file_on_finalize: true,
            stall_at: None,
            reported_size: None,
            fail_chunk: None,
            fail_init_for: None,
            sizes: Mutex::new(HashMap::new()),
        }
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.lock().unwrap().len()
    }

    pub fn chunk_lens(&self) -> Vec<usize> {
        self.chunks.lock().unwrap().iter().map(|c| c.2).collect()
    }

    fn file_doc(&self, upload_id: &str, size: u64) -> GirderFile {
        GirderFile {
            id: format!("file-{upload_id}"),
            name: String::new(),
            size: Some(self.reported_size.unwrap_or(size)),
            mime_type: None,
            item_id: None,
        }
    }
}

impl FileService for MockFiles {
    fn init_upload<'a>(
        &'a self,
        folder_id: &'a str,
        name: &'a str,
        size: u64,
        mime_type: &'a str,
    ) -> BoxFuture<'a, Result<UploadHandle, RemoteError>> {
        Box::pin(async move {
            if self.fail_init_for.as_deref() == Some(name) {
                return Err(RemoteError::Api {
                    status: 500,
                    body: "init refused".into(),
                });
            }
            let mut inits = self.inits.lock().unwrap();
            inits.push((folder_id.into(), name.into(), size, mime_type.into()));
            let id = format!("up-{}", inits.len());
            self.sizes.lock().unwrap().insert(id.clone(), size);
            Ok(UploadHandle {
                id,
                size,
                received: 0,
            })
        })
    }

    fn send_chunk<'a>(
        &'a self,
        upload_id: &'a str,
        offset: u64,
        data: &'a [u8],
    ) -> BoxFuture<'a, Result<ChunkAck, RemoteError>> {
        Box::pin(async move {
            let index = {
                let mut chunks = self.chunks.lock().unwrap();
                chunks.push((upload_id.into(), offset, data.len()));
                chunks.len()
            };
            if self.fail_chunk == Some(index) {
                return Err(RemoteError::Transport("connection reset".into()));
            }

            let size = self.sizes.lock().unwrap().get(upload_id).copied().unwrap_or(0);
            let mut received = offset + data.len() as u64;
            if let Some(stall) = self.stall_at {
                received = received.min(stall);
            }
            self.acks.lock().unwrap().push(received);

            if received >= size {
                if self.file_on_final_chunk {
                    return Ok(ChunkAck {
                        received: None,
                        file: Some(self.file_doc(upload_id, size)),
                    });
                }
                return Ok(ChunkAck::default());
            }

            Ok(ChunkAck {
                received: self.report_received.then_some(received),
                file: None,
            })
        })
    }

    fn finalize_upload<'a>(
        &'a self,
        upload_id: &'a str,
    ) -> BoxFuture<'a, Result<ChunkAck, RemoteError>> {
        Box::pin(async move {
            *self.finalize_calls.lock().unwrap() += 1;
            if !self.file_on_finalize {
                return Ok(ChunkAck::default());
            }
            let size = self.sizes.lock().unwrap().get(upload_id).copied().unwrap_or(0);
            Ok(ChunkAck {
                received: None,
                file: Some(self.file_doc(upload_id, size)),
            })
        })
    }
}
