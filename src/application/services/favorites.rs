//! Ordered favorite-photo bookkeeping.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::domain::entities::PhotoId;
use crate::domain::ports::FavoritesStorePort;

/// Ordered set of favorited photo ids backed by a persistent store.
///
/// Ids keep the order in which they were favorited, oldest first; toggling
/// a favorite off and on again moves it to the end. Every mutation writes
/// the full list through the store before returning, so the persisted state
/// never lags the in-memory one.
pub struct FavoritesService {
    store: Arc<dyn FavoritesStorePort>,
    ids: RwLock<Vec<PhotoId>>,
}

impl FavoritesService {
    /// Creates the service and loads the persisted ids.
    #[must_use]
    pub fn new(store: Arc<dyn FavoritesStorePort>) -> Self {
        let ids: Vec<PhotoId> = store.load_ids().into_iter().map(PhotoId::new).collect();
        debug!(count = ids.len(), "Favorites loaded");
        Self {
            store,
            ids: RwLock::new(ids),
        }
    }

    /// Whether this photo is currently favorited.
    #[must_use]
    pub fn is_favorite(&self, id: &PhotoId) -> bool {
        self.ids.read().contains(id)
    }

    /// Flips the favorite state of a photo and persists the new list.
    /// Returns true when the photo is a favorite afterwards.
    pub fn toggle(&self, id: &PhotoId) -> bool {
        let mut ids = self.ids.write();
        let now_favorite = match ids.iter().position(|known| known == id) {
            Some(index) => {
                ids.remove(index);
                false
            }
            None => {
                ids.push(id.clone());
                true
            }
        };
        self.persist(&ids);
        now_favorite
    }

    /// Snapshot of the favorited ids, oldest first.
    #[must_use]
    pub fn ids(&self) -> Vec<PhotoId> {
        self.ids.read().clone()
    }

    /// Number of favorited photos.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.read().len()
    }

    /// Returns true when nothing is favorited.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.read().is_empty()
    }

    fn persist(&self, ids: &[PhotoId]) {
        let raw: Vec<String> = ids.iter().map(|id| id.as_str().to_owned()).collect();
        self.store.save_ids(&raw);
    }
}
