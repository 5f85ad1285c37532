//! Photo entity, source tagging, and id-based deduplication.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::breed::Breed;

/// Unique identifier of a photo, stable across sources.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhotoId(pub String);

impl PhotoId {
    /// Creates a new `PhotoId` from any string-like input.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PhotoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PhotoId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PhotoId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Which upstream service a photo record came from.
///
/// A record that carries no source tag decodes as [`PhotoSource::PrimaryApi`];
/// DTO decoding applies that fallback through this `Default` impl.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhotoSource {
    /// The breed catalog API (TheCatAPI-shaped).
    #[default]
    PrimaryApi,
    /// The supplementary random-photo API (cataas-shaped).
    SecondaryApi,
}

impl std::fmt::Display for PhotoSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PrimaryApi => write!(f, "primary"),
            Self::SecondaryApi => write!(f, "secondary"),
        }
    }
}

/// One photo record as held by the feeds.
///
/// Identity is `id`: two records with the same id are the same photo, and
/// enrichment may swap a sparse record for a fuller one without ever creating
/// a duplicate entry. `url` may be absent for a stub awaiting enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    /// Stable record identifier.
    pub id: PhotoId,
    /// Where the image bytes live, when known.
    pub url: Option<String>,
    /// Breed information, when the source attached any.
    pub breed: Option<Breed>,
    /// Originating service.
    pub source: PhotoSource,
}

impl Photo {
    /// Creates a photo with no breed information from the primary source.
    #[must_use]
    pub fn new(id: impl Into<PhotoId>, url: Option<String>) -> Self {
        Self {
            id: id.into(),
            url,
            breed: None,
            source: PhotoSource::default(),
        }
    }

    /// Attaches breed information.
    #[must_use]
    pub fn with_breed(mut self, breed: Breed) -> Self {
        self.breed = Some(breed);
        self
    }

    /// Tags the record with an explicit source.
    #[must_use]
    pub const fn with_source(mut self, source: PhotoSource) -> Self {
        self.source = source;
        self
    }

    /// Breed display name, when known.
    #[must_use]
    pub fn breed_name(&self) -> Option<&str> {
        self.breed.as_ref().map(|b| b.name.as_str())
    }

    /// Breed origin, when known.
    #[must_use]
    pub fn origin(&self) -> Option<&str> {
        self.breed.as_ref().and_then(|b| b.origin.as_deref())
    }

    /// Breed temperament, when known.
    #[must_use]
    pub fn temperament(&self) -> Option<&str> {
        self.breed.as_ref().and_then(|b| b.temperament.as_deref())
    }

    /// Breed description, when known.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.breed.as_ref().and_then(|b| b.description.as_deref())
    }

    /// Returns true when a by-id detail fetch could improve this record.
    ///
    /// Only primary-source records qualify: the secondary service knows
    /// nothing about breeds and its ids are unknown to the detail endpoint.
    #[must_use]
    pub fn needs_enrichment(&self) -> bool {
        if self.source != PhotoSource::PrimaryApi {
            return false;
        }
        match &self.breed {
            None => true,
            Some(breed) => !breed.is_complete(),
        }
    }

    /// Builds the record that replaces this one after an enrichment fetch:
    /// same id and source, fetched url when present, breed merged field by
    /// field so the most complete version wins.
    #[must_use]
    pub fn enriched_from(&self, fetched: &Photo) -> Photo {
        let breed = match (&self.breed, &fetched.breed) {
            (Some(current), Some(incoming)) => Some(current.merged_with(incoming)),
            (None, Some(incoming)) => Some(incoming.clone()),
            (Some(current), None) => Some(current.clone()),
            (None, None) => None,
        };
        Photo {
            id: self.id.clone(),
            url: fetched.url.clone().or_else(|| self.url.clone()),
            breed,
            source: self.source,
        }
    }
}

/// Drops later occurrences of already-seen ids, preserving first-seen order.
#[must_use]
pub fn dedup_by_id(photos: Vec<Photo>) -> Vec<Photo> {
    let mut seen: HashSet<PhotoId> = HashSet::with_capacity(photos.len());
    let mut out = Vec::with_capacity(photos.len());
    for photo in photos {
        if seen.insert(photo.id.clone()) {
            out.push(photo);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(id: &str) -> Photo {
        Photo::new(id, Some(format!("https://cdn.example/{id}.jpg")))
    }

    #[test]
    fn test_default_source_is_primary() {
        assert_eq!(PhotoSource::default(), PhotoSource::PrimaryApi);
        assert_eq!(photo("a").source, PhotoSource::PrimaryApi);
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let input = vec![photo("a"), photo("b"), photo("a"), photo("c"), photo("b")];
        let out = dedup_by_id(input);
        let ids: Vec<&str> = out.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_needs_enrichment_without_breed() {
        assert!(photo("a").needs_enrichment());
    }

    #[test]
    fn test_needs_enrichment_with_partial_breed() {
        let partial = photo("a").with_breed(Breed::new("abys", "Abyssinian"));
        assert!(partial.needs_enrichment());

        let complete = photo("a").with_breed(
            Breed::new("abys", "Abyssinian")
                .with_origin("Egypt")
                .with_temperament("Active")
                .with_description("A lively breed."),
        );
        assert!(!complete.needs_enrichment());
    }

    #[test]
    fn test_secondary_records_never_enrich() {
        let secondary = photo("x").with_source(PhotoSource::SecondaryApi);
        assert!(!secondary.needs_enrichment());
    }

    #[test]
    fn test_enriched_from_merges_breed_and_url() {
        let current = Photo::new("a", None).with_breed(Breed::new("abys", "Abyssinian"));
        let fetched = photo("a").with_breed(
            Breed::new("abys", "Abyssinian")
                .with_origin("Egypt")
                .with_temperament("Active")
                .with_description("A lively breed."),
        );

        let merged = current.enriched_from(&fetched);
        assert_eq!(merged.id, current.id);
        assert!(merged.url.is_some());
        assert!(merged.breed.as_ref().is_some_and(Breed::is_complete));
    }

    #[test]
    fn test_enriched_from_keeps_known_url_when_fetch_has_none() {
        let current = photo("a");
        let fetched = Photo::new("a", None);

        let merged = current.enriched_from(&fetched);
        assert_eq!(merged.url, current.url);
    }
}
