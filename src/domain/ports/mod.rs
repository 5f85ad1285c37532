mod catalog_port;
mod favorites_store_port;
mod image_cache_port;

pub use catalog_port::{CatalogPort, SearchOrder};
pub use favorites_store_port::FavoritesStorePort;
pub use image_cache_port::{BlobStorePort, CacheError, CacheResult, ImageCachePort};
