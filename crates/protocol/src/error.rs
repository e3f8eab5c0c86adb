//! Remote access error shared by every remote-call seam.

/// Failure of a call to the remote content store.
///
/// Carries the original cause as text so it can cross crate boundaries
/// (and be cloned into per-item reports) without dragging the HTTP
/// client's error type along.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl RemoteError {
    /// Returns `true` if the remote reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RemoteError::NotFound(_) | RemoteError::Api { status: 400 | 404, .. }
        )
    }
}
