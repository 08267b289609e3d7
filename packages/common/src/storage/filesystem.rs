use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::BufReader;

use super::error::StorageError;
use super::path::{AssetPath, validate_relative_path};
use super::traits::{AssetStore, BoxReader};

/// Filesystem-backed asset store serving objects from a media directory.
///
/// Objects live at `{media_root}/{relative_path}` and are addressed publicly
/// as `{public_base}/{relative_path}`. Ownership of a URL is decided by the
/// public base prefix.
pub struct FilesystemAssetStore {
    media_root: PathBuf,
    public_base: String,
    max_size: u64,
}

impl FilesystemAssetStore {
    /// Create a new filesystem asset store rooted at `media_root`.
    ///
    /// `public_base` is the URL under which the media directory is served,
    /// e.g. `https://example.com/media`.
    pub async fn new(
        media_root: PathBuf,
        public_base: String,
        max_size: u64,
    ) -> Result<Self, StorageError> {
        fs::create_dir_all(&media_root).await?;
        fs::create_dir_all(media_root.join(".tmp")).await?;
        Ok(Self {
            media_root,
            public_base: public_base.trim_end_matches('/').to_string(),
            max_size,
        })
    }

    /// The public URL for a store-relative path.
    fn url_for(&self, relative: &str) -> String {
        format!("{}/{}", self.public_base, relative)
    }

    /// Recover the store-relative path from an owned URL.
    ///
    /// Returns `None` for foreign URLs or URLs whose tail is not a safe
    /// relative path.
    fn relative_from_url<'a>(&self, url: &'a str) -> Option<&'a str> {
        let relative = url.strip_prefix(&self.public_base)?.strip_prefix('/')?;
        validate_relative_path(relative).ok()?;
        Some(relative)
    }

    /// Resolve a validated relative path to its location on disk.
    fn object_path(&self, relative: &str) -> PathBuf {
        self.media_root.join(relative)
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.media_root
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl AssetStore for FilesystemAssetStore {
    async fn put(&self, data: &[u8], path: &AssetPath) -> Result<String, StorageError> {
        if data.len() as u64 > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: data.len() as u64,
                limit: self.max_size,
            });
        }

        let object_path = self.object_path(path.as_str());

        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Some(parent) = object_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        if let Err(e) = fs::rename(&temp_path, &object_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        tracing::debug!(path = %path, bytes = data.len(), "stored asset");
        Ok(self.url_for(path.as_str()))
    }

    fn owns_url(&self, url: &str) -> bool {
        self.relative_from_url(url).is_some()
    }

    async fn delete_url(&self, url: &str) -> Result<bool, StorageError> {
        let Some(relative) = self.relative_from_url(url) else {
            return Ok(false);
        };
        match fs::remove_file(self.object_path(relative)).await {
            Ok(()) => {
                tracing::debug!(path = relative, "deleted asset");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists_url(&self, url: &str) -> Result<bool, StorageError> {
        let Some(relative) = self.relative_from_url(url) else {
            return Ok(false);
        };
        Ok(fs::try_exists(self.object_path(relative)).await?)
    }

    async fn get_stream(&self, relative_path: &str) -> Result<BoxReader, StorageError> {
        validate_relative_path(relative_path)?;
        match fs::File::open(self.object_path(relative_path)).await {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(relative_path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn size(&self, relative_path: &str) -> Result<u64, StorageError> {
        validate_relative_path(relative_path)?;
        match fs::metadata(self.object_path(relative_path)).await {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(relative_path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tokio::io::AsyncReadExt;

    const BASE: &str = "http://127.0.0.1:3000/media";

    async fn temp_store() -> (FilesystemAssetStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = FilesystemAssetStore::new(
            dir.path().join("media"),
            BASE.to_string(),
            10 * 1024 * 1024,
        )
        .await
        .unwrap();
        (store, dir)
    }

    fn path_for(prefix: &str) -> AssetPath {
        AssetPath::generate(prefix, "photo.png", Utc::now()).unwrap()
    }

    async fn read_all(mut reader: BoxReader) -> Vec<u8> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await.unwrap();
        buf
    }

    #[tokio::test]
    async fn put_returns_url_under_public_base() {
        let (store, _dir) = temp_store().await;
        let url = store.put(b"fake png", &path_for("advisors")).await.unwrap();
        assert!(url.starts_with("http://127.0.0.1:3000/media/advisors/"), "{url}");
        assert!(store.owns_url(&url));
        assert!(store.exists_url(&url).await.unwrap());
    }

    #[tokio::test]
    async fn put_then_stream_round_trip() {
        let (store, _dir) = temp_store().await;
        let path = path_for("posts");
        let url = store.put(b"image bytes", &path).await.unwrap();

        let relative = url.strip_prefix(&format!("{BASE}/")).unwrap();
        let data = read_all(store.get_stream(relative).await.unwrap()).await;
        assert_eq!(data, b"image bytes");
        assert_eq!(store.size(relative).await.unwrap(), 11);
    }

    #[tokio::test]
    async fn trailing_slash_in_base_is_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilesystemAssetStore::new(
            dir.path().join("media"),
            format!("{BASE}/"),
            1024,
        )
        .await
        .unwrap();
        let url = store.put(b"x", &path_for("posts")).await.unwrap();
        assert!(url.starts_with("http://127.0.0.1:3000/media/posts/"), "{url}");
        assert!(store.owns_url(&url));
    }

    #[tokio::test]
    async fn delete_url_removes_object() {
        let (store, _dir) = temp_store().await;
        let url = store.put(b"bye", &path_for("facilities")).await.unwrap();

        assert!(store.delete_url(&url).await.unwrap());
        assert!(!store.exists_url(&url).await.unwrap());
    }

    #[tokio::test]
    async fn delete_url_twice_is_a_noop() {
        let (store, _dir) = temp_store().await;
        let url = store.put(b"bye", &path_for("facilities")).await.unwrap();

        assert!(store.delete_url(&url).await.unwrap());
        assert!(!store.delete_url(&url).await.unwrap());
    }

    #[tokio::test]
    async fn foreign_urls_are_not_owned_and_delete_is_noop() {
        let (store, _dir) = temp_store().await;
        let foreign = "https://cdn.example.org/images/banner.jpg";
        assert!(!store.owns_url(foreign));
        assert!(!store.delete_url(foreign).await.unwrap());
        assert!(!store.exists_url(foreign).await.unwrap());
    }

    #[tokio::test]
    async fn owned_prefix_with_traversal_tail_is_rejected() {
        let (store, _dir) = temp_store().await;
        let sneaky = format!("{BASE}/../outside.png");
        assert!(!store.owns_url(&sneaky));
        assert!(!store.delete_url(&sneaky).await.unwrap());
    }

    #[tokio::test]
    async fn size_limit_enforced_and_temp_cleaned() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilesystemAssetStore::new(dir.path().join("media"), BASE.to_string(), 10)
            .await
            .unwrap();

        let result = store.put(b"more than ten bytes", &path_for("posts")).await;
        assert!(matches!(result, Err(StorageError::SizeLimitExceeded { .. })));

        let tmp_entries: Vec<_> = std::fs::read_dir(dir.path().join("media/.tmp"))
            .unwrap()
            .collect();
        assert_eq!(tmp_entries.len(), 0);
    }

    #[tokio::test]
    async fn get_stream_not_found() {
        let (store, _dir) = temp_store().await;
        let result = store.get_stream("posts/never-written.png").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn get_stream_rejects_traversal() {
        let (store, _dir) = temp_store().await;
        let result = store.get_stream("../outside").await;
        assert!(matches!(result, Err(StorageError::InvalidPath(_))));
    }

    #[tokio::test]
    async fn constructor_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("deep/nested/media");
        assert!(!base.exists());

        let _store = FilesystemAssetStore::new(base.clone(), BASE.to_string(), 1024)
            .await
            .unwrap();

        assert!(base.exists());
        assert!(base.join(".tmp").exists());
    }
}
