//! Domain layer with core business entities and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{Breed, BreedId, FeedCollection, ImageKey, Photo, PhotoId, PhotoSource};
pub use errors::ApiError;
pub use ports::{BlobStorePort, CatalogPort, FavoritesStorePort, ImageCachePort, SearchOrder};
