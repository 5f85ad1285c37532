//! Infinite-scroll gating.

/// Default number of rows before the end of a feed that arms the trigger.
pub const DEFAULT_LOOKAHEAD: usize = 3;

/// Decides when a scroll position should fetch the next feed page.
///
/// The trigger fires when the visible row is exactly `lookahead` rows from
/// the end of the collection, and at most once per collection length. A
/// user parked on the trigger row therefore causes one fetch, not one per
/// scroll event, and nothing fires again until the feed actually grew.
#[derive(Debug, Clone)]
pub struct ScrollTrigger {
    lookahead: usize,
    last_fired_len: Option<usize>,
}

impl Default for ScrollTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_LOOKAHEAD)
    }
}

impl ScrollTrigger {
    /// Creates a trigger that arms `lookahead` rows before the end.
    #[must_use]
    pub const fn new(lookahead: usize) -> Self {
        Self {
            lookahead,
            last_fired_len: None,
        }
    }

    /// Reports a row becoming visible; returns true when the caller should
    /// fetch the next page.
    ///
    /// For a collection shorter than the lookahead the trigger row is the
    /// first row. An empty collection never fires.
    pub fn should_load_more(&mut self, visible_index: usize, len: usize) -> bool {
        if len == 0 || self.last_fired_len == Some(len) {
            return false;
        }
        if visible_index != len.saturating_sub(self.lookahead) {
            return false;
        }
        self.last_fired_len = Some(len);
        true
    }

    /// Forgets the last firing, as a refresh that rebuilt the feed must.
    pub fn reset(&mut self) {
        self.last_fired_len = None;
    }
}
