//! Application layer with the feed aggregator and its companion services.

/// Service implementations.
pub mod services;

pub use services::breed_search::filter_breeds;
pub use services::favorites::FavoritesService;
pub use services::feed_aggregator::FeedAggregator;
pub use services::saved_gallery::SavedGalleryService;
pub use services::scroll_trigger::{DEFAULT_LOOKAHEAD, ScrollTrigger};
pub use services::warmup::WarmupRunner;
