//! Domain types for the image delivery pipeline.

use std::sync::Arc;

/// Identity of one decoded-image request: a URL plus the target pixel size.
///
/// Two requests for the same URL at different target sizes are distinct cache
/// entries; the pipeline never synthesizes one size from another. The on-disk
/// blob tier, by contrast, is keyed by URL alone, so every size shares the
/// same downloaded bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageKey {
    /// Source URL of the encoded image bytes.
    pub url: String,
    /// Requested width in pixels.
    pub width: u32,
    /// Requested height in pixels.
    pub height: u32,
}

impl ImageKey {
    /// Creates a key for a downsampled load at the given target size.
    #[must_use]
    pub fn new(url: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            url: url.into(),
            width,
            height,
        }
    }

    /// Creates a degenerate key that decodes at full resolution.
    #[must_use]
    pub fn original(url: impl Into<String>) -> Self {
        Self::new(url, 0, 0)
    }

    /// Long dimension the decoded image must fit within.
    #[must_use]
    pub const fn max_dimension(&self) -> u32 {
        if self.width > self.height {
            self.width
        } else {
            self.height
        }
    }

    /// Returns true when both dimensions are zero, which disables
    /// downsampling entirely.
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        self.max_dimension() == 0
    }
}

impl std::fmt::Display for ImageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}x{}", self.url, self.width, self.height)
    }
}

/// Which tier satisfied an image load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOrigin {
    /// Served from the in-memory decoded cache.
    MemoryCache,
    /// Decoded from bytes found in the disk cache.
    DiskCache,
    /// Downloaded from the network.
    Network,
}

impl std::fmt::Display for ImageOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MemoryCache => write!(f, "memory"),
            Self::DiskCache => write!(f, "disk"),
            Self::Network => write!(f, "network"),
        }
    }
}

/// A decoded image together with the key it was loaded under and the tier
/// that produced it.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// The key this image was resolved for.
    pub key: ImageKey,
    /// The decoded pixels, shared between all waiters of a coalesced load.
    pub image: Arc<image::DynamicImage>,
    /// The tier that satisfied the load.
    pub origin: ImageOrigin,
}

/// Lifecycle of one visible element's image load.
///
/// Transitions are `Empty -> Loading -> {Ready, Failed}`. A `Loading` session
/// can be pre-empted back to `Loading` by a new URL, or frozen in place by
/// cancellation. Terminal phases only change when a different URL is loaded.
#[derive(Debug, Clone, Default)]
pub enum LoadPhase {
    /// No load has been requested yet.
    #[default]
    Empty,
    /// A resolution is in progress.
    Loading,
    /// The image resolved successfully.
    Ready(Arc<image::DynamicImage>),
    /// The URL was missing or the fetch/decode failed.
    Failed,
}

impl LoadPhase {
    /// Returns true if the image is ready for rendering.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Returns true while a resolution is in progress.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Returns true if the load ended in failure.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_dimension_takes_long_side() {
        assert_eq!(ImageKey::new("u", 320, 240).max_dimension(), 320);
        assert_eq!(ImageKey::new("u", 240, 320).max_dimension(), 320);
    }

    #[test]
    fn test_degenerate_key_disables_downsampling() {
        assert!(ImageKey::original("u").is_degenerate());
        assert!(!ImageKey::new("u", 0, 1).is_degenerate());
        assert!(!ImageKey::new("u", 300, 300).is_degenerate());
    }

    #[test]
    fn test_keys_distinct_per_size() {
        let a = ImageKey::new("https://cdn.example/cat.jpg", 300, 300);
        let b = ImageKey::new("https://cdn.example/cat.jpg", 900, 900);
        assert_ne!(a, b);
    }

    #[test]
    fn test_phase_predicates() {
        assert!(LoadPhase::Loading.is_loading());
        assert!(LoadPhase::Failed.is_failed());
        let ready = LoadPhase::Ready(Arc::new(image::DynamicImage::new_rgb8(1, 1)));
        assert!(ready.is_ready());
        assert!(!ready.is_failed());
    }
}
