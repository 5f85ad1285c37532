//! Configuration loading and tuning types.

pub mod core_config;

pub use core_config::{
    ApiTuning, ConfigError, CoreConfig, FeedTuning, ImageTuning, ScrollTuning, WarmupPlan,
};
