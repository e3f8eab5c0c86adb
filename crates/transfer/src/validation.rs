use crate::TransferError;

/// Checks an archive entry name and returns the basename it is uploaded
/// under.
///
/// ZIP names come from whatever tool wrote the archive, so both `/` and `\`
/// count as separators whatever the host. Absolute names, drive letters,
/// `..` segments and NUL bytes are rejected.
pub fn validate_entry_path(entry_path: &str) -> Result<&str, TransferError> {
    let invalid = |reason: &str| TransferError::InvalidPath(format!("{reason}: {entry_path:?}"));

    if entry_path.trim().is_empty() {
        return Err(TransferError::InvalidPath("empty entry name".into()));
    }
    if entry_path.contains('\0') {
        return Err(invalid("NUL byte in entry name"));
    }
    if entry_path.starts_with(['/', '\\']) {
        return Err(invalid("absolute entry path"));
    }

    let mut segments = entry_path.split(['/', '\\']);
    if segments.clone().next().is_some_and(|first| first.contains(':')) {
        return Err(invalid("drive or scheme prefix in entry path"));
    }
    if segments.clone().any(|segment| segment == "..") {
        return Err(invalid("entry escapes archive root"));
    }

    segments
        .rfind(|segment| !segment.is_empty() && *segment != ".")
        .ok_or_else(|| invalid("entry has no file name"))
}
