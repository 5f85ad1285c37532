//! Persistent storage adapters.

pub mod favorites_file;

pub use favorites_file::JsonFavoritesStore;
