//! Path sanitizing for entity keys and file names.

use crate::root::SegmentPolicy;
use crate::traits::{StorageError, StorageResult};

/// Convert a raw entity key into a folder segment.
///
/// Deterministic and idempotent for every accepted key.
pub fn sanitize_segment(raw_key: &str, policy: SegmentPolicy) -> StorageResult<String> {
    let trimmed = raw_key.trim();
    let segment = match policy {
        SegmentPolicy::Underscore => trimmed.split_whitespace().collect::<Vec<_>>().join("_"),
        SegmentPolicy::Verbatim => trimmed.to_string(),
    };
    validate_segment(&segment)?;
    Ok(segment)
}

/// Reject segments that are empty or could escape their root.
pub fn validate_segment(segment: &str) -> StorageResult<()> {
    if segment.trim().is_empty() {
        return Err(StorageError::InvalidKey("Key must not be empty".to_string()));
    }
    if segment.contains("..") || segment.starts_with('/') || segment == "." {
        return Err(StorageError::InvalidKey(format!(
            "Key contains a path traversal sequence: {}",
            segment
        )));
    }
    if segment.contains(['/', '\\', '\0']) {
        return Err(StorageError::InvalidKey(format!(
            "Key contains a path separator: {}",
            segment
        )));
    }
    Ok(())
}

/// A file name must be exactly one path component.
pub fn validate_file_name(file_name: &str) -> StorageResult<()> {
    if file_name.is_empty() || file_name == "." || file_name == ".." {
        return Err(StorageError::InvalidKey(format!(
            "Invalid file name: {:?}",
            file_name
        )));
    }
    if file_name.contains(['/', '\\', '\0']) {
        return Err(StorageError::InvalidKey(format!(
            "File name must be a single path component: {}",
            file_name
        )));
    }
    Ok(())
}

/// Reduce a client-supplied name to `[A-Za-z0-9._-]`.
///
/// Leading dots are dropped so the result is never hidden or relative. Returns `None`
/// when nothing usable is left.
pub fn clean_component(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '_' || c == '.') {
        None
    } else {
        Some(cleaned.to_string())
    }
}
