//! Upstream photo service adapters.

pub mod client;
pub mod dto;

pub use client::{ApiConfig, CatApiClient};
