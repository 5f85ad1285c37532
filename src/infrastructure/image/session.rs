//! Per-element image load sessions.
//!
//! A session tracks the load lifecycle of one visible element (one grid cell,
//! one detail view). It owns the element's [`LoadPhase`] and at most one
//! worker task; superseded or cancelled loads are aborted at the session
//! level and never touch the pipeline's shared in-flight state.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::domain::entities::{ImageKey, LoadPhase};

use super::pipeline::ImagePipeline;

/// Drives image loads for a single visible element.
pub struct ImageLoadSession {
    pipeline: Arc<ImagePipeline>,
    inner: Arc<Mutex<SessionInner>>,
}

struct SessionInner {
    phase: LoadPhase,
    /// URL of the last load that reached `Ready`. Failures never set this,
    /// so a failed URL is always retried when requested again.
    loaded_url: Option<String>,
    generation: u64,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl std::fmt::Debug for ImageLoadSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageLoadSession")
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}

impl ImageLoadSession {
    /// Creates an idle session backed by the given pipeline.
    #[must_use]
    pub fn new(pipeline: Arc<ImagePipeline>) -> Self {
        Self {
            pipeline,
            inner: Arc::new(Mutex::new(SessionInner {
                phase: LoadPhase::Empty,
                loaded_url: None,
                generation: 0,
                task: None,
            })),
        }
    }

    /// Returns a snapshot of the current phase.
    #[must_use]
    pub fn phase(&self) -> LoadPhase {
        self.inner.lock().phase.clone()
    }

    /// Requests the image at `url`, downsampled to the given target size.
    ///
    /// Reloading the URL that is currently shown is a no-op. Any other URL
    /// supersedes the in-progress load: the previous worker is aborted and
    /// its outcome discarded. A missing URL fails the session immediately.
    pub fn load(&self, url: Option<String>, width: u32, height: u32) {
        let mut inner = self.inner.lock();

        if url.is_some() && url == inner.loaded_url {
            trace!(url = ?url, "Image already loaded, skipping");
            return;
        }

        if let Some(task) = inner.task.take() {
            task.abort();
        }
        inner.generation += 1;
        let generation = inner.generation;

        let Some(url) = url else {
            inner.phase = LoadPhase::Failed;
            return;
        };

        inner.phase = LoadPhase::Loading;

        let pipeline = self.pipeline.clone();
        let state = self.inner.clone();
        let task = tokio::spawn(async move {
            let key = ImageKey::new(url.clone(), width, height);
            let loaded = pipeline.load(&key).await;

            let mut inner = state.lock();
            if inner.generation != generation {
                return;
            }
            match loaded {
                Some(loaded) => {
                    debug!(url = %url, origin = %loaded.origin, "Session image ready");
                    inner.phase = LoadPhase::Ready(loaded.image);
                    inner.loaded_url = Some(url);
                }
                None => {
                    debug!(url = %url, "Session image failed");
                    inner.phase = LoadPhase::Failed;
                }
            }
            inner.task = None;
        });

        inner.task = Some(task);
    }

    /// Stops the in-progress load, freezing the phase where it stands.
    ///
    /// The pipeline's shared in-flight load, if any, keeps running for other
    /// waiters and for the cache.
    pub fn cancel(&self) {
        let mut inner = self.inner.lock();
        inner.generation += 1;
        if let Some(task) = inner.task.take() {
            task.abort();
            trace!("Cancelled image load session");
        }
    }
}

impl Drop for ImageLoadSession {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::infrastructure::image::disk_cache::DiskImageCache;
    use crate::infrastructure::image::pipeline::PipelineConfig;

    async fn create_test_pipeline() -> (Arc<ImagePipeline>, tempfile::TempDir) {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let disk_cache = Arc::new(
            DiskImageCache::new(temp_dir.path().to_path_buf(), 1024 * 1024)
                .await
                .unwrap(),
        );
        let pipeline = ImagePipeline::new(PipelineConfig::default(), disk_cache).unwrap();
        (Arc::new(pipeline), temp_dir)
    }

    fn test_image() -> Arc<image::DynamicImage> {
        Arc::new(image::DynamicImage::new_rgb8(4, 4))
    }

    /// Seeds the pipeline's memory cache through the public resolve path.
    async fn seed_memory(pipeline: &ImagePipeline, url: &str, width: u32, height: u32) {
        let img = test_image();
        pipeline
            .resolve(ImageKey::new(url, width, height), move || async move {
                Some(img)
            })
            .await;
    }

    async fn wait_until(what: &str, mut condition: impl FnMut() -> bool) {
        for _ in 0..100 {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("timed out waiting for {what}");
    }

    #[tokio::test]
    async fn test_new_session_is_empty() {
        let (pipeline, _temp) = create_test_pipeline().await;
        let session = ImageLoadSession::new(pipeline);
        assert!(matches!(session.phase(), LoadPhase::Empty));
    }

    #[tokio::test]
    async fn test_missing_url_fails_immediately() {
        let (pipeline, _temp) = create_test_pipeline().await;
        let session = ImageLoadSession::new(pipeline);

        session.load(None, 300, 300);
        assert!(session.phase().is_failed());
    }

    #[tokio::test]
    async fn test_load_reaches_ready_from_cache() {
        let (pipeline, _temp) = create_test_pipeline().await;
        let url = "https://cdn.example/cat.jpg";
        seed_memory(&pipeline, url, 300, 300).await;

        let session = ImageLoadSession::new(pipeline);
        session.load(Some(url.to_string()), 300, 300);

        wait_until("ready phase", || session.phase().is_ready()).await;
    }

    #[tokio::test]
    async fn test_load_failure_reaches_failed() {
        let (pipeline, _temp) = create_test_pipeline().await;
        let session = ImageLoadSession::new(pipeline);

        // Connection refused; no disk entry either.
        session.load(Some("http://127.0.0.1:1/cat.jpg".to_string()), 300, 300);

        wait_until("failed phase", || session.phase().is_failed()).await;
    }

    #[tokio::test]
    async fn test_reloading_shown_url_is_noop() {
        let (pipeline, _temp) = create_test_pipeline().await;
        let url = "https://cdn.example/cat.jpg";
        seed_memory(&pipeline, url, 300, 300).await;

        let session = ImageLoadSession::new(pipeline);
        session.load(Some(url.to_string()), 300, 300);
        wait_until("ready phase", || session.phase().is_ready()).await;

        // A repeat request for the shown URL must not re-enter Loading.
        session.load(Some(url.to_string()), 300, 300);
        assert!(session.phase().is_ready());
    }

    #[tokio::test]
    async fn test_failed_url_is_retried() {
        let (pipeline, _temp) = create_test_pipeline().await;
        let url = "https://cdn.example/cat.jpg";

        let session = ImageLoadSession::new(pipeline.clone());
        session.load(Some(url.to_string()), 300, 300);
        wait_until("failed phase", || session.phase().is_failed()).await;

        // The URL becomes loadable; a repeat request goes through.
        seed_memory(&pipeline, url, 300, 300).await;
        session.load(Some(url.to_string()), 300, 300);
        wait_until("ready phase", || session.phase().is_ready()).await;
    }

    #[tokio::test]
    async fn test_cancel_freezes_phase_mid_flight() {
        let (pipeline, _temp) = create_test_pipeline().await;
        let url = "https://cdn.example/slow.jpg";
        let key = ImageKey::new(url, 300, 300);

        // Park a slow load in the pipeline so the session joins it.
        let slow_pipeline = pipeline.clone();
        let slow_key = key.clone();
        tokio::spawn(async move {
            slow_pipeline
                .resolve(slow_key, || async {
                    tokio::time::sleep(Duration::from_millis(60)).await;
                    Some(test_image())
                })
                .await
        });
        tokio::time::sleep(Duration::from_millis(10)).await;

        let session = ImageLoadSession::new(pipeline);
        session.load(Some(url.to_string()), 300, 300);
        assert!(session.phase().is_loading());

        session.cancel();

        // The shared load settles, but the cancelled session stays frozen.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(session.phase().is_loading());
    }

    #[tokio::test]
    async fn test_new_url_supersedes_in_progress_load() {
        let (pipeline, _temp) = create_test_pipeline().await;
        let slow_url = "https://cdn.example/slow.jpg";
        let fast_url = "https://cdn.example/fast.jpg";
        seed_memory(&pipeline, fast_url, 300, 300).await;

        let slow_pipeline = pipeline.clone();
        let slow_key = ImageKey::new(slow_url, 300, 300);
        tokio::spawn(async move {
            slow_pipeline
                .resolve(slow_key, || async {
                    tokio::time::sleep(Duration::from_millis(80)).await;
                    Some(test_image())
                })
                .await
        });
        tokio::time::sleep(Duration::from_millis(10)).await;

        let session = ImageLoadSession::new(pipeline);
        session.load(Some(slow_url.to_string()), 300, 300);
        assert!(session.phase().is_loading());

        session.load(Some(fast_url.to_string()), 300, 300);
        wait_until("ready phase", || session.phase().is_ready()).await;
        let shown = session.phase();

        // The superseded load settles later without clobbering the result.
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(session.phase().is_ready());
        if let (LoadPhase::Ready(before), LoadPhase::Ready(after)) = (shown, session.phase()) {
            assert!(Arc::ptr_eq(&before, &after));
        } else {
            panic!("expected ready phases");
        }
    }
}
