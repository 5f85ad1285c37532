//! Port definitions for the two image cache tiers.

use std::sync::Arc;

use bytes::Bytes;

use crate::domain::entities::ImageKey;

/// Result type for cache operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Errors that can occur during cache operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CacheError {
    /// Entry not found in cache.
    #[error("entry not found: {0}")]
    NotFound(String),
    /// Failed to decode image bytes.
    #[error("decode error: {0}")]
    DecodeError(String),
    /// I/O error during a cache operation.
    #[error("IO error: {0}")]
    IoError(String),
    /// Network error during a download.
    #[error("network error: {0}")]
    NetworkError(String),
}

/// Port for the decoded-image memory tier, keyed by URL plus target size.
/// Implementations must be thread-safe.
#[async_trait::async_trait]
pub trait ImageCachePort: Send + Sync {
    /// Attempts to get a decoded image from the cache.
    /// Returns `None` if not cached.
    async fn get(&self, key: &ImageKey) -> Option<Arc<image::DynamicImage>>;

    /// Stores a decoded image in the cache.
    async fn put(&self, key: ImageKey, image: Arc<image::DynamicImage>);

    /// Removes an entry from the cache.
    async fn evict(&self, key: &ImageKey);

    /// Returns the current number of cached images.
    fn len(&self) -> usize;

    /// Returns true if the cache is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears all entries from the cache.
    async fn clear(&self);
}

/// Port for the encoded-bytes disk tier, keyed by URL alone.
///
/// Every target size of the same URL shares one blob; decode and
/// downsampling happen above this tier.
#[async_trait::async_trait]
pub trait BlobStorePort: Send + Sync {
    /// Reads the stored bytes for a URL, if present.
    async fn read_bytes(&self, url: &str) -> Option<Bytes>;

    /// Stores the encoded bytes for a URL.
    ///
    /// # Errors
    /// Returns an error if the blob cannot be persisted.
    async fn write_bytes(&self, url: &str, bytes: &[u8]) -> CacheResult<()>;

    /// Returns true if a blob for this URL is stored.
    async fn contains(&self, url: &str) -> bool;

    /// Removes the blob for a URL, if present.
    async fn remove(&self, url: &str);
}
