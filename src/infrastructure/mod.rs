//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// Discord gateway and HTTP adapter.
pub mod discord;
/// Card rendering, image caches and CDN helpers.
pub mod image;
/// Profile persistence on SQLite or PostgreSQL.
pub mod persistence;

pub use config::{AppConfig, CliArgs, ConfigStore, LogLevel};
pub use discord::{DiscordError, ProfileBot, SerenityUploadSink, build_client};
pub use image::{ImagePipeline, init_fonts};
