//! Port definition for favorite-id persistence.

/// Port for the external favorite-ids store.
///
/// The store is a plain get/set string-array interface persisted
/// synchronously on every write; ordering of the ids is preserved verbatim.
pub trait FavoritesStorePort: Send + Sync {
    /// Reads the persisted ids, oldest favorite first.
    fn load_ids(&self) -> Vec<String>;

    /// Persists the full id list, replacing whatever was stored.
    fn save_ids(&self, ids: &[String]);
}

#[cfg(test)]
pub mod mock {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::RwLock;

    use super::FavoritesStorePort;

    /// In-memory favorites store that counts writes.
    #[derive(Default)]
    pub struct MemoryFavoritesStore {
        ids: RwLock<Vec<String>>,
        saves: AtomicUsize,
    }

    impl MemoryFavoritesStore {
        /// Creates an empty store.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Creates a store pre-seeded with ids.
        #[must_use]
        pub fn with_ids(ids: &[&str]) -> Self {
            Self {
                ids: RwLock::new(ids.iter().map(ToString::to_string).collect()),
                saves: AtomicUsize::new(0),
            }
        }

        /// Number of `save_ids` calls observed.
        pub fn save_count(&self) -> usize {
            self.saves.load(Ordering::SeqCst)
        }
    }

    impl FavoritesStorePort for MemoryFavoritesStore {
        fn load_ids(&self) -> Vec<String> {
            self.ids.read().clone()
        }

        fn save_ids(&self, ids: &[String]) {
            *self.ids.write() = ids.to_vec();
            self.saves.fetch_add(1, Ordering::SeqCst);
        }
    }
}
