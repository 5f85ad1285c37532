//! Bounded, deduplicated, paginated photo collection.

use std::collections::HashSet;

use super::photo::{Photo, PhotoId, dedup_by_id};

/// One feed's worth of photos, in arrival order, paired with its page cursor.
///
/// The collection upholds three invariants: no two items share an id, the
/// length never exceeds the retention cap, and trimming removes the oldest
/// items from the front only after an append. The page cursor advances only
/// when a page contributed at least one new record, so a transiently empty
/// response re-requests the same page instead of skipping it.
#[derive(Debug, Clone)]
pub struct FeedCollection {
    items: Vec<Photo>,
    page: usize,
    cap: usize,
}

impl FeedCollection {
    /// Creates an empty collection with the given retention cap.
    #[must_use]
    pub const fn new(cap: usize) -> Self {
        Self {
            items: Vec::new(),
            page: 0,
            cap,
        }
    }

    /// Current items, oldest first.
    #[must_use]
    pub fn items(&self) -> &[Photo] {
        &self.items
    }

    /// Page cursor for the next fetch.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Configured retention cap.
    #[must_use]
    pub const fn cap(&self) -> usize {
        self.cap
    }

    /// Number of retained photos.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true when no photos are retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns true if a photo with this id is currently retained.
    #[must_use]
    pub fn contains(&self, id: &PhotoId) -> bool {
        self.items.iter().any(|p| &p.id == id)
    }

    /// Appends a fetched page, dropping records whose id is already present,
    /// then trims the oldest items down to the cap. Advances the page cursor
    /// only when at least one new record was inserted. Returns the number of
    /// records actually inserted.
    pub fn absorb_page(&mut self, page_items: Vec<Photo>) -> usize {
        let mut seen: HashSet<PhotoId> = self.items.iter().map(|p| p.id.clone()).collect();
        let mut inserted = 0;
        for photo in page_items {
            if seen.insert(photo.id.clone()) {
                self.items.push(photo);
                inserted += 1;
            }
        }
        if inserted > 0 {
            self.page += 1;
        }
        self.trim_to_cap();
        inserted
    }

    /// Replaces the whole collection with one fresh page, as a refresh does.
    /// The cursor lands on 1 when the page had content, 0 otherwise, so the
    /// next load-more continues after the page just shown.
    pub fn replace_with(&mut self, page_items: Vec<Photo>) {
        self.items = dedup_by_id(page_items);
        self.trim_to_cap();
        self.page = usize::from(!self.items.is_empty());
    }

    /// Clears the collection and rewinds the cursor to the first page.
    pub fn reset(&mut self) {
        self.items.clear();
        self.page = 0;
    }

    /// Swaps the retained record with the same id for `photo`, preserving its
    /// position. Returns true if a record was replaced.
    pub fn substitute(&mut self, photo: &Photo) -> bool {
        match self.items.iter_mut().find(|p| p.id == photo.id) {
            Some(slot) => {
                *slot = photo.clone();
                true
            }
            None => false,
        }
    }

    fn trim_to_cap(&mut self) {
        if self.items.len() > self.cap {
            let excess = self.items.len() - self.cap;
            self.items.drain(..excess);
        }
    }
}
