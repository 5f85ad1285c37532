//! Library configuration.
//!
//! All tuning knobs of the feeds and the image pipeline live here, loadable
//! from an optional TOML file. Missing files and malformed content degrade to
//! the built-in defaults; a consuming app only handles hard I/O failures.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::ports::SearchOrder;
use crate::infrastructure::api::ApiConfig;
use crate::infrastructure::image::PipelineConfig;

const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "cathub";
const APP_NAME: &str = "cathub";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("failed to determine config directory")]
    ConfigDirNotFound,
    /// The config file exists but could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Feed pagination and retention tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedTuning {
    /// Page size of a breed's first load.
    #[serde(default = "default_initial_batch")]
    pub initial_batch: usize,

    /// Page size of subsequent loads.
    #[serde(default = "default_more_batch")]
    pub more_batch: usize,

    /// Page size used by a refresh.
    #[serde(default = "default_refresh_limit")]
    pub refresh_limit: usize,

    /// Retention cap of each per-breed collection.
    #[serde(default = "default_breed_cap")]
    pub breed_cap: usize,

    /// Retention cap of the global collection.
    #[serde(default = "default_global_cap")]
    pub global_cap: usize,

    /// Slots of each global batch reserved for the secondary source.
    #[serde(default = "default_secondary_floor")]
    pub secondary_floor: usize,

    /// Server-side ordering of search pages.
    #[serde(default)]
    pub order: SearchOrder,
}

impl Default for FeedTuning {
    fn default() -> Self {
        Self {
            initial_batch: default_initial_batch(),
            more_batch: default_more_batch(),
            refresh_limit: default_refresh_limit(),
            breed_cap: default_breed_cap(),
            global_cap: default_global_cap(),
            secondary_floor: default_secondary_floor(),
            order: SearchOrder::default(),
        }
    }
}

/// Infinite-scroll trigger tuning.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ScrollTuning {
    /// How many items before the end of a feed the next page is requested.
    #[serde(default = "default_lookahead")]
    pub lookahead: usize,
}

impl Default for ScrollTuning {
    fn default() -> Self {
        Self {
            lookahead: default_lookahead(),
        }
    }
}

/// Launch warm-up plan.
#[derive(Debug, Clone, Deserialize)]
pub struct WarmupPlan {
    /// How many breeds from the top of the catalog to pre-load.
    #[serde(default = "default_warmup_breeds")]
    pub breed_count: usize,

    /// Delay before each follow-up sweep, in seconds. The number of entries
    /// is the number of sweep passes.
    #[serde(default = "default_sweep_delays")]
    pub sweep_delays_secs: Vec<u64>,
}

impl WarmupPlan {
    /// The sweep schedule as durations.
    #[must_use]
    pub fn sweep_delays(&self) -> Vec<Duration> {
        self.sweep_delays_secs
            .iter()
            .map(|secs| Duration::from_secs(*secs))
            .collect()
    }
}

impl Default for WarmupPlan {
    fn default() -> Self {
        Self {
            breed_count: default_warmup_breeds(),
            sweep_delays_secs: default_sweep_delays(),
        }
    }
}

/// Image cache and pipeline tuning.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ImageTuning {
    /// Maximum decoded images held in memory.
    #[serde(default = "default_memory_capacity")]
    pub memory_capacity: usize,

    /// Disk cache budget in megabytes.
    #[serde(default = "default_disk_capacity_mb")]
    pub disk_capacity_mb: u64,

    /// Image download timeout in seconds.
    #[serde(default = "default_image_timeout")]
    pub timeout_secs: u64,
}

impl Default for ImageTuning {
    fn default() -> Self {
        Self {
            memory_capacity: default_memory_capacity(),
            disk_capacity_mb: default_disk_capacity_mb(),
            timeout_secs: default_image_timeout(),
        }
    }
}

/// Upstream service endpoints and authentication.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiTuning {
    /// Base URL of the breed catalog service.
    #[serde(default = "default_primary_base")]
    pub primary_base_url: String,

    /// Base URL of the random-photo service.
    #[serde(default = "default_secondary_base")]
    pub secondary_base_url: String,

    /// Optional API key for the primary service.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_api_timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiTuning {
    fn default() -> Self {
        Self {
            primary_base_url: default_primary_base(),
            secondary_base_url: default_secondary_base(),
            api_key: None,
            timeout_secs: default_api_timeout(),
        }
    }
}

/// Complete library configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoreConfig {
    /// Feed pagination and retention.
    #[serde(default)]
    pub feeds: FeedTuning,

    /// Infinite-scroll trigger.
    #[serde(default)]
    pub scroll: ScrollTuning,

    /// Launch warm-up plan.
    #[serde(default)]
    pub warmup: WarmupPlan,

    /// Image caches and pipeline.
    #[serde(default)]
    pub images: ImageTuning,

    /// Upstream services.
    #[serde(default)]
    pub api: ApiTuning,
}

impl CoreConfig {
    /// Loads configuration from a file, using defaults when the file is
    /// missing and when it fails to parse.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        match toml::from_str::<Self>(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                warn!(error = %e, "Failed to parse config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Loads configuration from the default platform path, degrading to
    /// defaults on any failure.
    #[must_use]
    pub fn load() -> Self {
        Self::default_config_path()
            .and_then(|path| Self::load_from(&path).ok())
            .unwrap_or_default()
    }

    /// Returns the default config file path.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// The image pipeline configuration this file describes.
    #[must_use]
    pub const fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            memory_capacity: self.images.memory_capacity,
            disk_capacity: self.images.disk_capacity_mb * 1024 * 1024,
            timeout_secs: self.images.timeout_secs,
        }
    }

    /// The catalog client configuration this file describes.
    #[must_use]
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            primary_base_url: self.api.primary_base_url.clone(),
            secondary_base_url: self.api.secondary_base_url.clone(),
            api_key: self.api.api_key.clone(),
            timeout_secs: self.api.timeout_secs,
        }
    }
}

fn default_initial_batch() -> usize {
    8
}

fn default_more_batch() -> usize {
    6
}

fn default_refresh_limit() -> usize {
    10
}

fn default_breed_cap() -> usize {
    100
}

fn default_global_cap() -> usize {
    200
}

fn default_secondary_floor() -> usize {
    2
}

fn default_lookahead() -> usize {
    3
}

fn default_warmup_breeds() -> usize {
    8
}

fn default_sweep_delays() -> Vec<u64> {
    vec![2, 6]
}

fn default_memory_capacity() -> usize {
    300
}

fn default_disk_capacity_mb() -> u64 {
    200
}

fn default_image_timeout() -> u64 {
    25
}

fn default_api_timeout() -> u64 {
    25
}

fn default_primary_base() -> String {
    ApiConfig::default().primary_base_url
}

fn default_secondary_base() -> String {
    ApiConfig::default().secondary_base_url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CoreConfig::default();

        assert_eq!(config.feeds.initial_batch, 8);
        assert_eq!(config.feeds.more_batch, 6);
        assert_eq!(config.feeds.refresh_limit, 10);
        assert_eq!(config.feeds.secondary_floor, 2);
        assert_eq!(config.scroll.lookahead, 3);
        assert_eq!(config.warmup.breed_count, 8);
        assert_eq!(config.warmup.sweep_delays_secs, vec![2, 6]);
        assert_eq!(config.images.memory_capacity, 300);
        assert_eq!(config.api.timeout_secs, 25);
    }

    #[test]
    fn test_parse_partial_config_keeps_defaults() {
        let toml_content = r#"
            [feeds]
            initial_batch = 12
            order = "desc"

            [scroll]
            lookahead = 5
        "#;

        let config: CoreConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.feeds.initial_batch, 12);
        assert_eq!(config.feeds.order, SearchOrder::Desc);
        assert_eq!(config.feeds.more_batch, 6);
        assert_eq!(config.scroll.lookahead, 5);
        assert_eq!(config.warmup.breed_count, 8);
    }

    #[test]
    fn test_pipeline_config_conversion() {
        let mut config = CoreConfig::default();
        config.images.disk_capacity_mb = 50;

        let pipeline = config.pipeline_config();
        assert_eq!(pipeline.disk_capacity, 50 * 1024 * 1024);
        assert_eq!(pipeline.memory_capacity, 300);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CoreConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.feeds.initial_batch, 8);
    }

    #[test]
    fn test_malformed_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "invalid_toml = [").unwrap();

        let config = CoreConfig::load_from(&path).unwrap();
        assert_eq!(config.feeds.initial_batch, 8);
    }

    #[test]
    fn test_warmup_sweep_delays() {
        let plan = WarmupPlan::default();
        let delays = plan.sweep_delays();
        assert_eq!(delays.len(), 2);
        assert_eq!(delays[0], Duration::from_secs(2));
        assert_eq!(delays[1], Duration::from_secs(6));
    }
}
