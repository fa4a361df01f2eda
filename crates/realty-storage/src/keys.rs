//! Shared key generation for storage backends.
//!
//! Key format: `uploads/{owner_id}/{unix_millis}_{sanitized_base}{ext}`.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use realty_core::constants::UPLOAD_KEY_ROOT;
use uuid::Uuid;

use crate::traits::{StorageError, StorageResult};

/// Extension used when the original filename has none.
pub const DEFAULT_EXTENSION: &str = ".jpg";

/// Characters left untouched by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Replace every character outside `[A-Za-z0-9._-]` with `_`.
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Split a sanitized filename into base name and extension (with leading dot).
/// A leading dot does not start an extension, and a bare trailing dot is not one.
pub fn split_extension(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < filename.len() => (&filename[..idx], &filename[idx..]),
        Some(idx) if idx > 0 => (&filename[..idx], ""),
        _ => (filename, ""),
    }
}

/// `uploads/{owner_id}/`
pub fn owner_prefix(owner_id: Uuid) -> String {
    format!("{}/{}/", UPLOAD_KEY_ROOT, owner_id)
}

/// Whether `key` lives in `owner_id`'s namespace.
pub fn is_owned_by(key: &str, owner_id: Uuid) -> bool {
    key.starts_with(&owner_prefix(owner_id))
}

/// Generate the storage key for an upload.
pub fn generate_upload_key(owner_id: Uuid, original_filename: &str, timestamp_millis: i64) -> String {
    let sanitized = sanitize_filename(original_filename);
    let (base, ext) = split_extension(&sanitized);
    let ext = if ext.is_empty() {
        DEFAULT_EXTENSION.to_string()
    } else {
        ext.to_lowercase()
    };
    format!(
        "{}{}_{}{}",
        owner_prefix(owner_id),
        timestamp_millis,
        base,
        ext
    )
}

/// Reject keys that could escape a backend's root.
pub fn validate_key(key: &str) -> StorageResult<()> {
    let invalid = |reason: &str| StorageError::InvalidKey {
        key: key.to_string(),
        reason: reason.to_string(),
    };

    if key.is_empty() {
        return Err(invalid("key is empty"));
    }
    if key.starts_with('/') {
        return Err(invalid("key must be relative"));
    }
    if key
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(invalid("key contains an empty or relative path segment"));
    }
    Ok(())
}

/// Percent-encode like `encodeURIComponent`, for object metadata values.
pub fn encode_uri_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}
