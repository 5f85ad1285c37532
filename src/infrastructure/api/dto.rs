//! Wire shapes of the upstream photo services.

use serde::Deserialize;

use crate::domain::entities::{Breed, Photo, PhotoId, PhotoSource};

/// Primary catalog breed entry.
#[derive(Debug, Deserialize)]
pub struct BreedResponse {
    /// Catalog breed identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Country of origin.
    pub origin: Option<String>,
    /// Comma-separated temperament traits.
    pub temperament: Option<String>,
    /// Long-form description.
    pub description: Option<String>,
}

impl From<BreedResponse> for Breed {
    fn from(dto: BreedResponse) -> Self {
        Self {
            id: dto.id.into(),
            name: dto.name,
            origin: dto.origin,
            temperament: dto.temperament,
            description: dto.description,
        }
    }
}

/// Primary catalog photo entry, as returned by search and by-id lookups.
#[derive(Debug, Deserialize)]
pub struct ImageResponse {
    /// Stable photo identifier.
    pub id: String,
    /// Image URL; absent for stub records.
    pub url: Option<String>,
    /// Breed annotations; the catalog sends at most one per photo.
    #[serde(default)]
    pub breeds: Vec<BreedResponse>,
    /// Source tag. The primary catalog never sends one, so decoding falls
    /// back to `PhotoSource::PrimaryApi` via its `Default`.
    #[serde(default)]
    pub source: PhotoSource,
}

impl From<ImageResponse> for Photo {
    fn from(dto: ImageResponse) -> Self {
        Self {
            id: PhotoId::new(dto.id),
            url: dto.url,
            breed: dto.breeds.into_iter().next().map(Breed::from),
            source: dto.source,
        }
    }
}

/// Secondary service random-photo entry.
///
/// The service has shipped both `_id` and `id` spellings; accept either.
#[derive(Debug, Deserialize)]
pub struct RandomPhotoResponse {
    /// Photo identifier, used to build the stable image URL.
    #[serde(alias = "_id")]
    pub id: String,
}
