//! Image handling infrastructure.
//!
//! This module provides:
//! - Memory caching of decoded images with LRU eviction
//! - Disk caching of encoded bytes for persistence
//! - A coalescing load pipeline (memory -> disk -> network)
//! - Per-element load sessions with cancellation

pub mod disk_cache;
pub mod memory_cache;
pub mod pipeline;
pub mod session;

pub use disk_cache::DiskImageCache;
pub use memory_cache::{CacheStats, MemoryImageCache};
pub use pipeline::{ImagePipeline, PipelineConfig};
pub use session::ImageLoadSession;
