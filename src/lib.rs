//! CatHub core - feed aggregation and cached image delivery.
//!
//! This crate implements the non-visual half of the CatHub photo browser:
//! paginated, deduplicated breed and multi-source photo feeds, and a
//! coalescing image pipeline with memory and disk cache tiers. A rendering
//! layer consumes the snapshots and decoded images this crate produces; it
//! owns no UI, no CLI, and no wire protocol of its own.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing feed, favorites, and policy services.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;

/// Current version of the library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = "cathub-core";
