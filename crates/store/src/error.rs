//! Store error types.

/// Errors produced by the local store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("file record {0} not found")]
    RecordNotFound(i64),

    #[error("store connection poisoned")]
    Poisoned,
}
