//! Coalescing image pipeline.
//!
//! Implements a three-tier load path (memory -> disk -> network) with at most
//! one in-flight fetch per [`ImageKey`] process-wide. Concurrent requests for
//! the same key await one shared load; the winning decode is stored in the
//! memory cache before any waiter is woken.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use tracing::{debug, error, info, trace, warn};

use crate::domain::entities::{ImageKey, ImageOrigin, LoadedImage};
use crate::domain::ports::{BlobStorePort, CacheError, CacheResult, ImageCachePort};

use super::disk_cache::DiskImageCache;
use super::memory_cache::MemoryImageCache;

type SharedLoad = Shared<BoxFuture<'static, Option<LoadedImage>>>;

/// Configuration for the image pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Maximum decoded images in the memory cache.
    pub memory_capacity: usize,
    /// Maximum disk cache size in bytes.
    pub disk_capacity: u64,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            memory_capacity: 300,
            disk_capacity: 200 * 1024 * 1024,
            timeout_secs: 25,
        }
    }
}

/// Orchestrates image loading from memory, disk, and network.
pub struct ImagePipeline {
    memory_cache: Arc<MemoryImageCache>,
    disk_cache: Arc<DiskImageCache>,
    in_flight: Arc<Mutex<HashMap<ImageKey, SharedLoad>>>,
    http_client: reqwest::Client,
    config: PipelineConfig,
}

impl std::fmt::Debug for ImagePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagePipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ImagePipeline {
    /// Creates a new pipeline with the given configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(config: PipelineConfig, disk_cache: Arc<DiskImageCache>) -> CacheResult<Self> {
        let memory_cache = Arc::new(MemoryImageCache::new(config.memory_capacity));

        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CacheError::NetworkError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            memory_cache,
            disk_cache,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            http_client,
            config,
        })
    }

    /// Creates a pipeline with default configuration and the default disk
    /// cache location.
    ///
    /// # Errors
    /// Returns error if the disk cache or HTTP client cannot be created.
    pub async fn with_defaults() -> CacheResult<Self> {
        let disk_cache = Arc::new(DiskImageCache::default_location().await?);
        Self::new(PipelineConfig::default(), disk_cache)
    }

    /// Resolves a key through the memory cache and the in-flight map, running
    /// `loader` only when this call starts a fresh load.
    ///
    /// The loader runs on a detached task, so it settles and populates the
    /// memory cache even when every waiter has been cancelled. Failures are
    /// never cached; the next call for the same key starts over.
    pub async fn resolve<F, Fut>(&self, key: ImageKey, loader: F) -> Option<Arc<image::DynamicImage>>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Option<Arc<image::DynamicImage>>> + Send + 'static,
    {
        let loader_key = key.clone();
        self.resolve_with(key, move || async move {
            loader().await.map(|image| LoadedImage {
                key: loader_key,
                image,
                origin: ImageOrigin::Network,
            })
        })
        .await
        .map(|loaded| loaded.image)
    }

    /// Loads an image through the built-in chain: disk bytes, then network,
    /// decoding and downsampling to the key's target size.
    pub async fn load(&self, key: &ImageKey) -> Option<LoadedImage> {
        let chain_key = key.clone();
        let disk_cache = self.disk_cache.clone();
        let http_client = self.http_client.clone();
        self.resolve_with(key.clone(), move || {
            fetch_chain(chain_key, disk_cache, http_client)
        })
        .await
    }

    /// Loads an image at full resolution, bypassing downsampling.
    pub async fn load_original(&self, url: &str) -> Option<LoadedImage> {
        self.load(&ImageKey::original(url)).await
    }

    /// Checks the memory cache without starting a load or promoting the entry.
    pub async fn check_memory_cache(&self, key: &ImageKey) -> Option<Arc<image::DynamicImage>> {
        self.memory_cache.peek(key).await
    }

    /// Returns the number of loads currently in flight.
    #[must_use]
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.lock().len()
    }

    /// Returns memory cache statistics.
    #[must_use]
    pub fn memory_cache_stats(&self) -> super::memory_cache::CacheStats {
        self.memory_cache.stats()
    }

    /// Clears all caches.
    pub async fn clear_all(&self) {
        self.memory_cache.clear().await;
        if let Err(e) = self.disk_cache.clear().await {
            warn!(error = %e, "Failed to clear disk cache");
        }
        info!("Cleared all image caches");
    }

    /// The coalescing core shared by [`Self::resolve`] and [`Self::load`].
    async fn resolve_with<F, Fut>(&self, key: ImageKey, loader: F) -> Option<LoadedImage>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Option<LoadedImage>> + Send + 'static,
    {
        if let Some(image) = self.memory_cache.get(&key).await {
            return Some(LoadedImage {
                key,
                image,
                origin: ImageOrigin::MemoryCache,
            });
        }

        let shared = {
            let mut in_flight = self.in_flight.lock();
            if let Some(existing) = in_flight.get(&key) {
                trace!(key = %key, "Joining in-flight load");
                existing.clone()
            } else {
                let memory_cache = self.memory_cache.clone();
                let map = self.in_flight.clone();
                let task_key = key.clone();

                // The task removes its own entry under the same lock held
                // here, so the insert below always lands first.
                let task = tokio::spawn(async move {
                    let result = loader().await;
                    if let Some(loaded) = &result {
                        memory_cache
                            .put(task_key.clone(), loaded.image.clone())
                            .await;
                    }
                    map.lock().remove(&task_key);
                    result
                });

                let shared: SharedLoad = task.map(|joined| joined.ok().flatten()).boxed().shared();
                in_flight.insert(key.clone(), shared.clone());
                shared
            }
        };

        shared.await
    }
}

/// Disk-then-network load path for one key.
async fn fetch_chain(
    key: ImageKey,
    disk_cache: Arc<DiskImageCache>,
    http_client: reqwest::Client,
) -> Option<LoadedImage> {
    if let Some(bytes) = disk_cache.read_bytes(&key.url).await {
        if let Some(image) = decode_and_downsample(bytes, &key).await {
            debug!(key = %key, "Decoded image from disk cache");
            return Some(LoadedImage {
                key,
                image,
                origin: ImageOrigin::DiskCache,
            });
        }
        // Stored bytes that no longer decode are useless; drop them and
        // fall through to a fresh download.
        warn!(key = %key, "Cached bytes failed to decode, refetching");
        disk_cache.remove(&key.url).await;
    }

    let bytes = download(&http_client, &key.url).await?;

    let disk = disk_cache.clone();
    let url = key.url.clone();
    let bytes_for_disk = bytes.clone();
    tokio::spawn(async move {
        if let Err(e) = disk.write_bytes(&url, &bytes_for_disk).await {
            warn!(url = %url, error = %e, "Failed to cache to disk");
        }
    });

    let image = decode_and_downsample(bytes, &key).await?;
    debug!(key = %key, "Image loaded from network");
    Some(LoadedImage {
        key,
        image,
        origin: ImageOrigin::Network,
    })
}

/// Downloads image bytes, treating any failure as a miss.
async fn download(client: &reqwest::Client, url: &str) -> Option<Bytes> {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!(url = %url, error = %e, "Image request failed");
            return None;
        }
    };

    if !response.status().is_success() {
        warn!(url = %url, status = %response.status(), "Image request rejected");
        return None;
    }

    match response.bytes().await {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            warn!(url = %url, error = %e, "Failed to read image body");
            None
        }
    }
}

/// Decodes bytes off the async runtime, bounding the long dimension by the
/// key's target size. Degenerate keys decode at full resolution.
async fn decode_and_downsample(bytes: Bytes, key: &ImageKey) -> Option<Arc<image::DynamicImage>> {
    let max_dim = key.max_dimension();
    let degenerate = key.is_degenerate();
    let key_for_log = key.clone();

    let result = tokio::task::spawn_blocking(move || {
        let img = image::load_from_memory(&bytes)?;
        if degenerate || (img.width() <= max_dim && img.height() <= max_dim) {
            Ok(img)
        } else {
            Ok::<_, image::ImageError>(img.thumbnail(max_dim, max_dim))
        }
    })
    .await;

    match result {
        Ok(Ok(img)) => Some(Arc::new(img)),
        Ok(Err(e)) => {
            warn!(key = %key_for_log, error = %e, "Failed to decode image");
            None
        }
        Err(e) => {
            error!(key = %key_for_log, error = %e, "Decode task panicked");
            None
        }
    }
}
