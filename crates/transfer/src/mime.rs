use std::path::Path;

use medsync_protocol::DEFAULT_MIME_TYPE;

/// Returns the MIME type announced to the server for `file_name`.
///
/// Lookup is by extension, case-insensitive. Unknown or missing
/// extensions map to `application/octet-stream`.
pub fn mime_type_for(file_name: &str) -> &'static str {
    match extension(file_name).as_deref() {
        Some("dcm" | "dicom") => "application/dicom",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        Some("csv") => "text/csv",
        Some("json") => "application/json",
        Some("zip") => "application/zip",
        Some("rar") => "application/x-rar-compressed",
        Some("7z") => "application/x-7z-compressed",
        Some("tar") => "application/x-tar",
        Some("gz") => "application/gzip",
        _ => DEFAULT_MIME_TYPE,
    }
}

/// Returns `true` for `.dcm` / `.dicom` names.
pub fn is_dicom_name(file_name: &str) -> bool {
    matches!(extension(file_name).as_deref(), Some("dcm" | "dicom"))
}

fn extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}
