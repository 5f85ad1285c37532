//! Resolving favorited ids back into photo records.

use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::domain::entities::{Photo, PhotoId};
use crate::domain::ports::CatalogPort;

/// Loads the full records behind a list of favorited photo ids.
pub struct SavedGalleryService {
    catalog: Arc<dyn CatalogPort>,
}

impl SavedGalleryService {
    /// Creates the service over the given catalog.
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogPort>) -> Self {
        Self { catalog }
    }

    /// Fetches every id's record concurrently and returns the ones that
    /// resolved, in the order of the input ids.
    ///
    /// Ids the catalog no longer knows and fetches that fail are dropped
    /// rather than surfaced; a favorites screen renders what it got.
    pub async fn load(&self, ids: &[PhotoId]) -> Vec<Photo> {
        let fetches = ids.iter().map(|id| self.catalog.photo_by_id(id));
        let results = join_all(fetches).await;

        let mut photos = Vec::with_capacity(ids.len());
        for (id, result) in ids.iter().zip(results) {
            match result {
                Ok(Some(photo)) => photos.push(photo),
                Ok(None) => debug!(id = %id, "Favorited photo no longer exists"),
                Err(e) => warn!(id = %id, error = %e, "Favorited photo fetch failed"),
            }
        }
        photos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::MockCatalog;

    fn photo(id: &str) -> Photo {
        Photo::new(id, Some(format!("https://cdn.example/{id}.jpg")))
    }

    #[tokio::test]
    async fn test_preserves_input_order() {
        let catalog = MockCatalog::new();
        catalog.set_detail(photo("a")).await;
        catalog.set_detail(photo("b")).await;
        catalog.set_detail(photo("c")).await;
        let service = SavedGalleryService::new(catalog.clone());

        let ids = vec![PhotoId::new("c"), PhotoId::new("a"), PhotoId::new("b")];
        let photos = service.load(&ids).await;

        let got: Vec<&str> = photos.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(got, vec!["c", "a", "b"]);
        assert_eq!(catalog.detail_calls(), 3);
    }

    #[tokio::test]
    async fn test_drops_unknown_ids() {
        let catalog = MockCatalog::new();
        catalog.set_detail(photo("a")).await;
        catalog.set_detail(photo("c")).await;
        let service = SavedGalleryService::new(catalog.clone());

        let ids = vec![PhotoId::new("a"), PhotoId::new("gone"), PhotoId::new("c")];
        let photos = service.load(&ids).await;

        let got: Vec<&str> = photos.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(got, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_empty_input_fetches_nothing() {
        let catalog = MockCatalog::new();
        let service = SavedGalleryService::new(catalog.clone());

        assert!(service.load(&[]).await.is_empty());
        assert_eq!(catalog.detail_calls(), 0);
    }
}
