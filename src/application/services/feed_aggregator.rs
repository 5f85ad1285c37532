//! Paginated, deduplicated photo feeds over the remote catalog.
//!
//! One aggregator owns every per-breed feed plus the mixed global feed.
//! All mutation goes through guarded operations: each breed has at most one
//! search in flight, the global feed has at most one, and each photo id has
//! at most one enrichment fetch. The fetches themselves run on detached
//! tasks, so a caller that stops awaiting cannot leave a guard set or a
//! collection half-updated.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures_util::future::join_all;
use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use crate::domain::entities::{Breed, BreedId, FeedCollection, Photo, PhotoId};
use crate::domain::ports::CatalogPort;
use crate::infrastructure::config::FeedTuning;

/// Everything the aggregator mutates, behind a single lock.
///
/// The lock is only ever taken for synchronous bookkeeping. No await point
/// sits inside a critical section.
struct AggregatorState {
    breeds: Vec<Breed>,
    breeds_loaded: bool,
    breeds_busy: bool,
    feeds: HashMap<BreedId, FeedCollection>,
    initialized: HashSet<BreedId>,
    busy: HashSet<BreedId>,
    global: FeedCollection,
    global_initialized: bool,
    global_busy: bool,
    enriching: HashSet<PhotoId>,
}

impl AggregatorState {
    fn new(global_cap: usize) -> Self {
        Self {
            breeds: Vec::new(),
            breeds_loaded: false,
            breeds_busy: false,
            feeds: HashMap::new(),
            initialized: HashSet::new(),
            busy: HashSet::new(),
            global: FeedCollection::new(global_cap),
            global_initialized: false,
            global_busy: false,
            enriching: HashSet::new(),
        }
    }

    fn feed_mut(&mut self, breed: &BreedId, cap: usize) -> &mut FeedCollection {
        self.feeds
            .entry(breed.clone())
            .or_insert_with(|| FeedCollection::new(cap))
    }

    fn find_photo(&self, id: &PhotoId) -> Option<Photo> {
        if let Some(found) = self.global.items().iter().find(|p| &p.id == id) {
            return Some(found.clone());
        }
        self.feeds
            .values()
            .find_map(|feed| feed.items().iter().find(|p| &p.id == id).cloned())
    }

    fn substitute_everywhere(&mut self, photo: &Photo) {
        let mut collections = usize::from(self.global.substitute(photo));
        for feed in self.feeds.values_mut() {
            collections += usize::from(feed.substitute(photo));
        }
        trace!(id = %photo.id, collections, "Substituted enriched record");
    }
}

/// Multi-source feed aggregator.
///
/// Holds one [`FeedCollection`] per browsed breed and one global collection
/// mixing the primary search pages with single random photos from the
/// secondary source. Clones are cheap and share state.
#[derive(Clone)]
pub struct FeedAggregator {
    catalog: Arc<dyn CatalogPort>,
    state: Arc<RwLock<AggregatorState>>,
    tuning: FeedTuning,
}

impl FeedAggregator {
    /// Creates an aggregator over the given catalog with the given tuning.
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogPort>, tuning: FeedTuning) -> Self {
        let state = AggregatorState::new(tuning.global_cap);
        Self {
            catalog,
            state: Arc::new(RwLock::new(state)),
            tuning,
        }
    }

    /// Tuning values this aggregator was built with.
    #[must_use]
    pub const fn tuning(&self) -> &FeedTuning {
        &self.tuning
    }

    /// Fetches the breed catalog once.
    ///
    /// Subsequent calls return immediately once a fetch has succeeded, and
    /// while a fetch is in flight. A failed fetch leaves the flag unset so
    /// the next call retries.
    pub async fn load_breeds_once(&self) {
        {
            let mut state = self.state.write();
            if state.breeds_loaded || state.breeds_busy {
                return;
            }
            state.breeds_busy = true;
        }

        let catalog = Arc::clone(&self.catalog);
        let state = Arc::clone(&self.state);
        let task = tokio::spawn(async move {
            let result = catalog.list_breeds().await;
            let mut state = state.write();
            state.breeds_busy = false;
            match result {
                Ok(breeds) => {
                    debug!(count = breeds.len(), "Breed catalog loaded");
                    state.breeds = breeds;
                    state.breeds_loaded = true;
                }
                Err(e) => warn!(error = %e, "Breed catalog fetch failed"),
            }
        });
        let _ = task.await;
    }

    /// Performs the first load for a breed's feed exactly once.
    ///
    /// The first call rewinds the feed and fetches one page at the initial
    /// batch size. Later calls, including concurrent ones, return without
    /// fetching. A feed whose initial fetch failed stays empty until a
    /// [`load_more`](Self::load_more) or [`refresh`](Self::refresh) fills it.
    pub async fn ensure_initial_load(&self, breed: &BreedId) {
        {
            let mut state = self.state.write();
            if !state.initialized.insert(breed.clone()) {
                return;
            }
            let cap = self.tuning.breed_cap;
            state.feed_mut(breed, cap).reset();
        }
        self.load_more(breed, self.tuning.initial_batch).await;
    }

    /// Fetches the next page for a breed's feed and appends the new records.
    ///
    /// At most one fetch per breed runs at a time; a call that finds one in
    /// flight returns without side effects. New records are deduplicated
    /// against the retained ones and the cursor advances only when the page
    /// contributed something. On failure the collection and cursor are left
    /// untouched, so the same page is retried next time.
    pub async fn load_more(&self, breed: &BreedId, batch: usize) {
        let page = {
            let mut state = self.state.write();
            if !state.busy.insert(breed.clone()) {
                return;
            }
            let cap = self.tuning.breed_cap;
            state.feed_mut(breed, cap).page()
        };

        let catalog = Arc::clone(&self.catalog);
        let state = Arc::clone(&self.state);
        let order = self.tuning.order;
        let cap = self.tuning.breed_cap;
        let breed = breed.clone();
        let task = tokio::spawn(async move {
            let result = catalog.search_photos(Some(&breed), batch, page, order).await;

            let mut state = state.write();
            state.busy.remove(&breed);
            match result {
                Ok(photos) => {
                    let feed = state.feed_mut(&breed, cap);
                    let inserted = feed.absorb_page(photos);
                    debug!(breed = %breed, inserted, next_page = feed.page(), "Feed page absorbed");
                }
                Err(e) => warn!(breed = %breed, page, error = %e, "Feed page fetch failed"),
            }
        });
        let _ = task.await;
    }

    /// Replaces a breed's feed with one fresh page.
    ///
    /// Shares the per-breed guard with [`load_more`](Self::load_more), so a
    /// refresh never races a pagination fetch for the same breed. Fetches
    /// page zero at the refresh limit; on success the collection is replaced
    /// and the cursor lands after the fetched page, on failure both are left
    /// untouched.
    pub async fn refresh(&self, breed: &BreedId) {
        {
            let mut state = self.state.write();
            if !state.busy.insert(breed.clone()) {
                return;
            }
        }

        let catalog = Arc::clone(&self.catalog);
        let state = Arc::clone(&self.state);
        let order = self.tuning.order;
        let limit = self.tuning.refresh_limit;
        let cap = self.tuning.breed_cap;
        let breed = breed.clone();
        let task = tokio::spawn(async move {
            let result = catalog.search_photos(Some(&breed), limit, 0, order).await;

            let mut state = state.write();
            state.busy.remove(&breed);
            match result {
                Ok(photos) => {
                    state.feed_mut(&breed, cap).replace_with(photos);
                    debug!(breed = %breed, "Feed refreshed");
                }
                Err(e) => warn!(breed = %breed, error = %e, "Feed refresh failed"),
            }
        });
        let _ = task.await;
    }

    /// Performs the first load of the global feed exactly once.
    pub async fn ensure_global_loaded_once(&self) {
        {
            let mut state = self.state.write();
            if state.global_initialized {
                return;
            }
            state.global_initialized = true;
            state.global.reset();
        }
        self.load_more_global(self.tuning.initial_batch).await;
    }

    /// Fetches the next global page from both sources and appends the merge.
    ///
    /// A fixed share of the batch, the secondary floor, is requested from
    /// the secondary source as individual random photos; the remainder is
    /// one primary search page. Both fetches run concurrently. The merged
    /// page keeps primary records first, then secondary, and a source that
    /// failed contributes nothing. When both sources fail the collection
    /// and cursor stay untouched.
    pub async fn load_more_global(&self, batch: usize) {
        let page = {
            let mut state = self.state.write();
            if state.global_busy {
                return;
            }
            state.global_busy = true;
            state.global.page()
        };

        let catalog = Arc::clone(&self.catalog);
        let state = Arc::clone(&self.state);
        let order = self.tuning.order;
        let secondary_share = self.tuning.secondary_floor.min(batch);
        let primary_share = batch - secondary_share;
        let task = tokio::spawn(async move {
            let primary = async {
                if primary_share == 0 {
                    Ok(Vec::new())
                } else {
                    catalog.search_photos(None, primary_share, page, order).await
                }
            };
            let secondary = join_all((0..secondary_share).map(|_| catalog.random_secondary()));
            let (primary_result, secondary_results) = tokio::join!(primary, secondary);

            let mut merged = Vec::new();
            match primary_result {
                Ok(photos) => merged.extend(photos),
                Err(e) => warn!(page, error = %e, "Primary source failed for global page"),
            }
            for result in secondary_results {
                match result {
                    Ok(Some(photo)) => merged.push(photo),
                    Ok(None) => {}
                    Err(e) => warn!(error = %e, "Secondary source failed for global page"),
                }
            }

            let mut state = state.write();
            state.global_busy = false;
            let inserted = state.global.absorb_page(merged);
            debug!(inserted, next_page = state.global.page(), "Global page absorbed");
        });
        let _ = task.await;
    }

    /// Rewinds the global feed and fetches one fresh mixed page.
    ///
    /// Returns without side effects while a global fetch is in flight, so a
    /// pull-to-refresh during pagination loses to the pagination.
    pub async fn soft_refresh_global(&self) {
        {
            let mut state = self.state.write();
            if state.global_busy {
                return;
            }
            state.global.reset();
        }
        self.load_more_global(self.tuning.refresh_limit).await;
    }

    /// Fetches full breed details for one photo and substitutes the richer
    /// record wherever the id is retained.
    ///
    /// Returns the enriched photo, or the already-complete retained record
    /// without a fetch. Returns `None` while another enrichment for the same
    /// id is in flight, when the id is unknown upstream, and on fetch
    /// failure; in all three cases every collection is left untouched.
    pub async fn enrich(&self, id: &PhotoId) -> Option<Photo> {
        let known = {
            let mut state = self.state.write();
            if state.enriching.contains(id) {
                return None;
            }
            let known = state.find_photo(id);
            if let Some(photo) = &known
                && !photo.needs_enrichment()
            {
                return Some(photo.clone());
            }
            state.enriching.insert(id.clone());
            known
        };

        let catalog = Arc::clone(&self.catalog);
        let state = Arc::clone(&self.state);
        let id = id.clone();
        let task = tokio::spawn(async move {
            let result = catalog.photo_by_id(&id).await;

            let mut state = state.write();
            state.enriching.remove(&id);
            match result {
                Ok(Some(fetched)) => {
                    let enriched = match &known {
                        Some(retained) => retained.enriched_from(&fetched),
                        None => fetched,
                    };
                    state.substitute_everywhere(&enriched);
                    Some(enriched)
                }
                Ok(None) => {
                    debug!(id = %id, "Photo unknown upstream");
                    None
                }
                Err(e) => {
                    warn!(id = %id, error = %e, "Enrichment fetch failed");
                    None
                }
            }
        });
        task.await.ok().flatten()
    }

    /// Snapshot of the loaded breed catalog.
    #[must_use]
    pub fn breeds(&self) -> Vec<Breed> {
        self.state.read().breeds.clone()
    }

    /// Whether the breed catalog has been loaded.
    #[must_use]
    pub fn breeds_loaded(&self) -> bool {
        self.state.read().breeds_loaded
    }

    /// Snapshot of a breed's feed, oldest retained photo first.
    #[must_use]
    pub fn photos_for(&self, breed: &BreedId) -> Vec<Photo> {
        self.state
            .read()
            .feeds
            .get(breed)
            .map(|feed| feed.items().to_vec())
            .unwrap_or_default()
    }

    /// Page cursor for a breed's next fetch.
    #[must_use]
    pub fn page_for(&self, breed: &BreedId) -> usize {
        self.state
            .read()
            .feeds
            .get(breed)
            .map_or(0, FeedCollection::page)
    }

    /// Whether a fetch for this breed is currently in flight.
    #[must_use]
    pub fn is_loading(&self, breed: &BreedId) -> bool {
        self.state.read().busy.contains(breed)
    }

    /// Snapshot of the global feed, oldest retained photo first.
    #[must_use]
    pub fn global_photos(&self) -> Vec<Photo> {
        self.state.read().global.items().to_vec()
    }

    /// Page cursor for the next global primary fetch.
    #[must_use]
    pub fn global_page(&self) -> usize {
        self.state.read().global.page()
    }

    /// Whether a global fetch is currently in flight.
    #[must_use]
    pub fn is_global_loading(&self) -> bool {
        self.state.read().global_busy
    }

    /// Whether an enrichment fetch for this photo is currently in flight.
    #[must_use]
    pub fn is_enriching(&self, id: &PhotoId) -> bool {
        self.state.read().enriching.contains(id)
    }
}

impl std::fmt::Debug for FeedAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("FeedAggregator")
            .field("breeds", &state.breeds.len())
            .field("feeds", &state.feeds.len())
            .field("global_len", &state.global.len())
            .finish_non_exhaustive()
    }
}
