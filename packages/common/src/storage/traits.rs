use async_trait::async_trait;
use tokio::io::AsyncRead;

use super::error::StorageError;
use super::path::AssetPath;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// URL-addressed asset storage.
///
/// Assets are written under generated, collision-free paths and addressed
/// afterwards by the durable public URL returned from [`AssetStore::put`].
/// URLs that were not minted by the store (externally hosted images pasted
/// into a form) are "foreign": deleting them is a no-op, never an error.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Store bytes under the given generated path and return the durable
    /// public URL to persist on the owning record.
    async fn put(&self, data: &[u8], path: &AssetPath) -> Result<String, StorageError>;

    /// Whether a URL was minted by this store.
    fn owns_url(&self, url: &str) -> bool;

    /// Delete the object behind a URL.
    ///
    /// Returns `Ok(true)` if an object was removed. Foreign URLs and
    /// already-deleted objects resolve to `Ok(false)`.
    async fn delete_url(&self, url: &str) -> Result<bool, StorageError>;

    /// Whether an object currently exists behind a URL. Foreign URLs are
    /// always `false`.
    async fn exists_url(&self, url: &str) -> Result<bool, StorageError>;

    /// Open a stored object for streaming by its store-relative path.
    async fn get_stream(&self, relative_path: &str) -> Result<BoxReader, StorageError>;

    /// Size in bytes of a stored object, by its store-relative path.
    async fn size(&self, relative_path: &str) -> Result<u64, StorageError>;
}
