//! Launch warm-up for the breed and global feeds.

use tracing::{debug, info};

use crate::application::services::feed_aggregator::FeedAggregator;
use crate::domain::entities::BreedId;
use crate::infrastructure::config::WarmupPlan;

/// Runs the launch warm-up sequence against an aggregator.
///
/// The warm-up fills the screens a user lands on first: the breed catalog,
/// the feeds of the leading breeds, and the global feed. Delayed sweep
/// passes afterwards repair feeds whose first fetch failed or came back
/// empty and freshen the ones that loaded.
#[derive(Clone)]
pub struct WarmupRunner {
    aggregator: FeedAggregator,
    plan: WarmupPlan,
}

impl WarmupRunner {
    /// Creates a runner for the given aggregator and plan.
    #[must_use]
    pub fn new(aggregator: FeedAggregator, plan: WarmupPlan) -> Self {
        Self { aggregator, plan }
    }

    /// Runs the whole warm-up, returning after the final sweep.
    ///
    /// Callers that want it in the background spawn it on the runtime; every
    /// step degrades on failure, so the warm-up itself never errors.
    pub async fn run(&self) {
        self.aggregator.load_breeds_once().await;
        let warm = self.warm_breeds();
        info!(
            breeds = warm.len(),
            sweeps = self.plan.sweep_delays_secs.len(),
            "Warm-up started"
        );

        for breed in &warm {
            self.aggregator.ensure_initial_load(breed).await;
        }
        self.aggregator.ensure_global_loaded_once().await;

        for delay in self.plan.sweep_delays() {
            tokio::time::sleep(delay).await;
            self.sweep_once().await;
        }
        debug!("Warm-up finished");
    }

    /// One repair pass over the warm breeds: a breed with no photos gets the
    /// initial page loaded again, a populated one gets a refresh.
    pub async fn sweep_once(&self) {
        for breed in &self.warm_breeds() {
            if self.aggregator.photos_for(breed).is_empty() {
                let batch = self.aggregator.tuning().initial_batch;
                self.aggregator.load_more(breed, batch).await;
            } else {
                self.aggregator.refresh(breed).await;
            }
        }
    }

    /// The leading breeds the plan covers, in catalog order.
    fn warm_breeds(&self) -> Vec<BreedId> {
        self.aggregator
            .breeds()
            .into_iter()
            .take(self.plan.breed_count)
            .map(|breed| breed.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::entities::{Breed, Photo};
    use crate::domain::ports::SearchOrder;
    use crate::domain::ports::mocks::MockCatalog;
    use crate::infrastructure::config::FeedTuning;

    fn tuning() -> FeedTuning {
        FeedTuning {
            initial_batch: 4,
            more_batch: 3,
            refresh_limit: 5,
            breed_cap: 50,
            global_cap: 50,
            secondary_floor: 2,
            order: SearchOrder::Asc,
        }
    }

    fn plan(breed_count: usize, sweep_delays_secs: Vec<u64>) -> WarmupPlan {
        WarmupPlan {
            breed_count,
            sweep_delays_secs,
        }
    }

    fn aggregator(catalog: &Arc<MockCatalog>) -> FeedAggregator {
        let catalog = Arc::clone(catalog);
        FeedAggregator::new(catalog, tuning())
    }

    fn beng() -> BreedId {
        BreedId::new("beng")
    }

    fn photos(ids: &[&str]) -> Vec<Photo> {
        ids.iter()
            .map(|id| Photo::new(*id, Some(format!("https://cdn.example/{id}.jpg"))))
            .collect()
    }

    fn ids(photos: &[Photo]) -> Vec<&str> {
        photos.iter().map(|p| p.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_run_fills_leading_breeds_and_global() {
        let catalog = MockCatalog::new();
        catalog
            .set_breeds(vec![
                Breed::new("beng", "Bengal"),
                Breed::new("sia", "Siamese"),
                Breed::new("pers", "Persian"),
            ])
            .await;
        catalog.set_page(Some("beng"), 0, photos(&["a"])).await;
        catalog.set_page(Some("sia"), 0, photos(&["b"])).await;
        catalog.set_page(None, 0, photos(&["g1"])).await;
        let agg = aggregator(&catalog);

        WarmupRunner::new(agg.clone(), plan(2, Vec::new())).run().await;

        assert_eq!(ids(&agg.photos_for(&beng())), vec!["a"]);
        assert_eq!(ids(&agg.photos_for(&BreedId::new("sia"))), vec!["b"]);
        assert_eq!(ids(&agg.global_photos()), vec!["g1"]);

        // The third breed is beyond the plan and was never fetched.
        assert!(agg.photos_for(&BreedId::new("pers")).is_empty());
        assert_eq!(catalog.search_calls(), 3);
    }

    #[tokio::test]
    async fn test_sweep_heals_a_feed_that_failed_to_load() {
        let catalog = MockCatalog::new();
        catalog.set_breeds(vec![Breed::new("beng", "Bengal")]).await;
        catalog.fail_searches(true).await;
        let agg = aggregator(&catalog);
        let runner = WarmupRunner::new(agg.clone(), plan(1, Vec::new()));

        runner.run().await;
        assert!(agg.photos_for(&beng()).is_empty());

        catalog.fail_searches(false).await;
        catalog.set_page(Some("beng"), 0, photos(&["a", "b"])).await;
        runner.sweep_once().await;

        assert_eq!(ids(&agg.photos_for(&beng())), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_sweep_refreshes_a_populated_feed() {
        let catalog = MockCatalog::new();
        catalog.set_breeds(vec![Breed::new("beng", "Bengal")]).await;
        catalog.set_page(Some("beng"), 0, photos(&["a"])).await;
        let agg = aggregator(&catalog);
        let runner = WarmupRunner::new(agg.clone(), plan(1, Vec::new()));

        runner.run().await;
        assert_eq!(ids(&agg.photos_for(&beng())), vec!["a"]);

        // A refresh re-fetches page zero and replaces; a load-more would
        // have asked for page one and appended nothing.
        catalog.set_page(Some("beng"), 0, photos(&["x", "y"])).await;
        runner.sweep_once().await;

        assert_eq!(ids(&agg.photos_for(&beng())), vec!["x", "y"]);
        assert_eq!(agg.page_for(&beng()), 1);
    }

    #[tokio::test]
    async fn test_run_executes_every_sweep() {
        let catalog = MockCatalog::new();
        catalog.set_breeds(vec![Breed::new("beng", "Bengal")]).await;
        catalog.set_page(Some("beng"), 0, photos(&["a"])).await;
        catalog.set_page(None, 0, photos(&["g1"])).await;
        let agg = aggregator(&catalog);

        WarmupRunner::new(agg.clone(), plan(1, vec![0, 0])).run().await;

        // One initial breed page, one global page, two sweep refreshes.
        assert_eq!(catalog.search_calls(), 4);
        assert_eq!(ids(&agg.photos_for(&beng())), vec!["a"]);
    }
}
