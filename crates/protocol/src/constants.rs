/// Size of one upload chunk (10 MiB).
///
/// Payloads at or below this size are sent in a single request.
pub const CHUNK_SIZE: usize = 10 * 1024 * 1024;

/// Prefix of center folder names on the Girder side (`CHU_Bordeaux`).
pub const CENTER_FOLDER_PREFIX: &str = "CHU_";

/// MIME type used when the file extension is unknown.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Header carrying the Girder authentication token.
pub const TOKEN_HEADER: &str = "Girder-Token";
