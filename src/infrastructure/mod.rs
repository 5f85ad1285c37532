//! Infrastructure layer with external service adapters.

/// Upstream photo service clients.
pub mod api;
/// Library configuration.
pub mod config;
/// Image handling (caching, coalesced loading, sessions).
pub mod image;
/// Favorites persistence.
pub mod storage;

pub use api::{ApiConfig, CatApiClient};
pub use config::{ConfigError, CoreConfig, FeedTuning, ScrollTuning, WarmupPlan};
pub use image::{
    CacheStats, DiskImageCache, ImageLoadSession, ImagePipeline, MemoryImageCache, PipelineConfig,
};
pub use storage::JsonFavoritesStore;
