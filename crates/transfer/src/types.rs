use std::time::Duration;

use medsync_protocol::CHUNK_SIZE;

/// Default pause between consecutive chunks.
pub const DEFAULT_PACING: Duration = Duration::from_millis(100);

/// Default wait before asking the server to finalize an upload.
pub const DEFAULT_FINALIZE_WAIT: Duration = Duration::from_millis(500);

/// Tuning knobs for [`ChunkedUploader`](crate::ChunkedUploader).
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOptions {
    /// Maximum bytes per chunk request.
    pub chunk_size: usize,
    /// Pause between chunks so the server is not saturated.
    pub pacing: Duration,
    /// Wait before the single finalize retry.
    pub finalize_wait: Duration,
    /// Fail (instead of warn) when the remote size differs from the payload.
    pub strict_size: bool,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            pacing: DEFAULT_PACING,
            finalize_wait: DEFAULT_FINALIZE_WAIT,
            strict_size: false,
        }
    }
}

/// An open upload on the remote side.
///
/// Lives from the initialize call until the upload finishes or fails;
/// never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadSession {
    pub remote_upload_id: String,
    pub target_folder_id: String,
    pub file_name: String,
    pub mime_type: String,
    pub total_size: u64,
    pub bytes_transferred: u64,
}

impl UploadSession {
    pub fn new(
        remote_upload_id: String,
        target_folder_id: &str,
        file_name: &str,
        mime_type: &str,
        total_size: u64,
    ) -> Self {
        Self {
            remote_upload_id,
            target_folder_id: target_folder_id.to_string(),
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            total_size,
            bytes_transferred: 0,
        }
    }

    /// Records a chunk acknowledgement and returns the next offset.
    ///
    /// The server-reported `received` count wins; servers that omit it are
    /// assumed to have taken the whole chunk.
    pub fn add_progress(&mut self, received: Option<u64>, sent: usize) -> u64 {
        self.bytes_transferred = received.unwrap_or(self.bytes_transferred + sent as u64);
        self.bytes_transferred
    }

    /// Returns `true` once every byte has been acknowledged.
    pub fn is_complete(&self) -> bool {
        self.bytes_transferred >= self.total_size
    }

    /// Integer percentage of acknowledged bytes.
    pub fn percent(&self) -> u64 {
        if self.total_size == 0 {
            return 100;
        }
        (self.bytes_transferred.min(self.total_size) * 100) / self.total_size
    }
}

/// A file created on the remote by a finished upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub file_id: String,
    pub name: String,
    /// Size as reported by the remote.
    pub size: u64,
    pub mime_type: String,
}
