//! Port definition for the remote photo catalog.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Breed, BreedId, Photo, PhotoId};
use crate::domain::errors::ApiError;

/// Server-side ordering of a photo search page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchOrder {
    /// Oldest records first.
    Asc,
    /// Newest records first.
    Desc,
    /// Server-shuffled order.
    #[default]
    Random,
}

impl SearchOrder {
    /// Value of the wire-level `order` query parameter.
    #[must_use]
    pub const fn as_query_value(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
            Self::Random => "RANDOM",
        }
    }
}

impl std::fmt::Display for SearchOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_query_value())
    }
}

/// Port for fetching breeds and photos from the remote services.
///
/// Implementations must be thread-safe; the aggregator issues calls from
/// detached tasks. A missing record is `Ok(None)`, not an error.
#[async_trait]
pub trait CatalogPort: Send + Sync {
    /// Fetches the full breed catalog.
    async fn list_breeds(&self) -> Result<Vec<Breed>, ApiError>;

    /// Fetches one page of photos, optionally scoped to a breed.
    async fn search_photos(
        &self,
        breed: Option<&BreedId>,
        limit: usize,
        page: usize,
        order: SearchOrder,
    ) -> Result<Vec<Photo>, ApiError>;

    /// Fetches a single photo with full breed details by id.
    async fn photo_by_id(&self, id: &PhotoId) -> Result<Option<Photo>, ApiError>;

    /// Fetches one random photo from the secondary source.
    async fn random_secondary(&self) -> Result<Option<Photo>, ApiError>;
}
