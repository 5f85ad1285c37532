//! Application services orchestrating feeds, favorites, and warm-up.

/// Breed-list filtering for the search bar.
pub mod breed_search;
/// Ordered favorite-photo bookkeeping.
pub mod favorites;
/// Paginated multi-source feed aggregation.
pub mod feed_aggregator;
/// Resolving favorited ids back into photo records.
pub mod saved_gallery;
/// Infinite-scroll gating.
pub mod scroll_trigger;
/// Launch warm-up sequencing.
pub mod warmup;
