//! Application configuration.

pub mod app_config;
pub mod args;
pub mod storage;

pub use app_config::{
    AppConfig, CacheConfig, DatabaseConfig, DeliveryStep, DiscordConfig, GalleryConfig,
    LimitsConfig, LogLevel, RateLimitConfig,
};
pub use args::CliArgs;
pub use storage::{ConfigError, ConfigStore};
