use chrono::{DateTime, Utc};

use super::error::StorageError;

/// Longest accepted file extension (covers "jpeg", "webp" and friends).
const MAX_EXTENSION_LEN: usize = 8;

/// A store-relative path for a new asset, generated to avoid collisions.
///
/// The layout is `{prefix}/{yyyymmddhhmmss}-{uuid}[.{ext}]` where `prefix` is
/// the owning collection's namespace and `ext` is the sanitized extension of
/// the original upload filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPath {
    relative: String,
}

impl AssetPath {
    /// Generate a fresh path under `prefix` for a file originally named
    /// `original_filename`. Only the extension of the original name is kept.
    pub fn generate(
        prefix: &str,
        original_filename: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, StorageError> {
        validate_relative_path(prefix)?;

        let stamp = now.format("%Y%m%d%H%M%S");
        let nonce = uuid::Uuid::new_v4();
        let relative = match sanitize_extension(original_filename) {
            Some(ext) => format!("{prefix}/{stamp}-{nonce}.{ext}"),
            None => format!("{prefix}/{stamp}-{nonce}"),
        };

        Ok(Self { relative })
    }

    /// The store-relative path string.
    pub fn as_str(&self) -> &str {
        &self.relative
    }
}

impl std::fmt::Display for AssetPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.relative)
    }
}

/// Extract a safe, lowercased extension from an upload filename.
///
/// Returns `None` when the filename has no usable extension; the asset is
/// then stored without one.
fn sanitize_extension(filename: &str) -> Option<String> {
    let (stem, ext) = filename.trim().rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }

    let ext = ext.to_ascii_lowercase();
    if ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }

    Some(ext)
}

/// Validate a store-relative path (as generated by [`AssetPath`] or received
/// from a serving route).
pub fn validate_relative_path(path: &str) -> Result<(), StorageError> {
    let err = |msg: &str| StorageError::InvalidPath(format!("{msg}: {path:?}"));

    if path.is_empty() {
        return Err(err("path is empty"));
    }
    if path.len() > 512 {
        return Err(err("path exceeds 512 characters"));
    }
    if path.contains('\0') {
        return Err(err("path contains null bytes"));
    }
    if path.contains('\\') {
        return Err(err("path contains backslashes"));
    }
    if path.starts_with('/') || path.ends_with('/') {
        return Err(err("path must not start or end with '/'"));
    }

    for segment in path.split('/') {
        if segment.is_empty() {
            return Err(err("path contains empty segments"));
        }
        if segment.starts_with('.') {
            return Err(err("path segments must not start with '.'"));
        }
    }

    if !path
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '-' | '_' | '.'))
    {
        return Err(err(
            "path contains invalid characters (allowed: a-zA-Z0-9, /, -, _, .)",
        ));
    }

    Ok(())
}
