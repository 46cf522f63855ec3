//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::domain::entities::{BotToken, UserId};

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Converts to tracing level.
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Bot configuration, from the TOML file merged with CLI/env values.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Bot token. Only ever taken from the CLI or environment.
    #[serde(skip)]
    pub token: Option<BotToken>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Discord settings.
    #[serde(default)]
    pub discord: DiscordConfig,

    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Per-user content limits.
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Button interaction rate limit.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Image pipeline caches.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Gallery view behavior.
    #[serde(default)]
    pub gallery: GalleryConfig,
}

/// Discord settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscordConfig {
    /// Channel receiving re-uploaded images and profile backups.
    #[serde(default)]
    pub storage_channel_id: Option<u64>,

    /// Users with full administrative rights.
    #[serde(default)]
    pub admin_ids: Vec<u64>,

    /// Role allowed to edit its own profile.
    #[serde(default)]
    pub allowed_role_id: Option<u64>,

    /// Link shown on the help embed.
    #[serde(default)]
    pub support_url: Option<String>,

    /// Whether to answer the localized `!` text commands.
    #[serde(default = "default_true")]
    pub text_commands: bool,
}

impl DiscordConfig {
    /// Admin ids as domain values.
    #[must_use]
    pub fn admins(&self) -> Vec<UserId> {
        self.admin_ids.iter().copied().map(UserId).collect()
    }
}

/// Database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL. SQLite is used when absent.
    #[serde(default)]
    pub url: Option<String>,

    /// SQLite database file.
    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: PathBuf,

    /// Connection pool size.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            sqlite_path: default_sqlite_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// Per-user content limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Images per gallery.
    pub max_images: usize,
    /// Quotes per profile.
    pub max_quotes: usize,
    /// Characters per quote.
    pub max_quote_length: usize,
    /// Characters per comment.
    pub max_comment_length: usize,
    /// Attachment size in bytes.
    pub max_file_size: u64,
    /// Accepted attachment content types.
    pub allowed_content_types: Vec<String>,
    /// Shortest username for regular users.
    pub min_username_length: usize,
    /// Longest username.
    pub max_username_length: usize,
    /// Comments shown under a gallery image.
    pub shown_comments: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_images: 3,
            max_quotes: 3,
            max_quote_length: 200,
            max_comment_length: 300,
            max_file_size: 8 * 1024 * 1024,
            allowed_content_types: ["image/jpeg", "image/png", "image/gif", "image/webp"]
                .into_iter()
                .map(String::from)
                .collect(),
            min_username_length: 2,
            max_username_length: 20,
            shown_comments: 3,
        }
    }
}

/// Sliding-window rate limit for button presses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Actions allowed per window.
    pub max_actions: usize,
    /// Window length in seconds.
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_actions: 10,
            window_secs: 60,
        }
    }
}

/// Image pipeline caches.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Entries per cache.
    pub capacity: usize,
    /// Seconds between background sweeps.
    pub sweep_period_secs: u64,
    /// Optional overall deadline for image downloads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_timeout_secs: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 50,
            sweep_period_secs: 600,
            fetch_timeout_secs: None,
        }
    }
}

/// Message update step tried when answering a button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStep {
    /// Edit the message carrying the buttons.
    EditOriginal,
    /// Send a follow-up with embed, file and buttons.
    FollowUpEmbed,
    /// Send a follow-up with the text summary only.
    FollowUpText,
    /// Post a plain message in the channel.
    ChannelMessage,
}

/// Gallery view behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Render cards when paging with buttons instead of showing raw images.
    pub render_cards_on_navigation: bool,
    /// Ordered fallbacks for updating a gallery message.
    pub delivery_steps: Vec<DeliveryStep>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            render_cards_on_navigation: false,
            delivery_steps: vec![
                DeliveryStep::EditOriginal,
                DeliveryStep::FollowUpEmbed,
                DeliveryStep::FollowUpText,
                DeliveryStep::ChannelMessage,
            ],
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_sqlite_path() -> PathBuf {
    PathBuf::from("./database/instabot.db")
}

fn default_max_connections() -> u32 {
    5
}

use super::args::CliArgs;

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: CliArgs) {
        if let Some(config_path) = args.config {
            self.config = Some(config_path);
        }
        if let Some(log_path) = args.log_path {
            self.log_path = Some(log_path);
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(token) = args.token {
            self.token = Some(BotToken::new_unchecked(token.trim()));
        }
        if let Some(url) = args.database_url.filter(|url| !url.trim().is_empty()) {
            self.database.url = Some(url);
        }
        if let Some(path) = args.sqlite_path {
            self.database.sqlite_path = path;
        }
        if let Some(channel) = args.storage_channel_id {
            self.discord.storage_channel_id = Some(channel);
        }
        if let Some(role) = args.allowed_role_id {
            self.discord.allowed_role_id = Some(role);
        }
        for admin in args.admin_ids {
            if !self.discord.admin_ids.contains(&admin) {
                self.discord.admin_ids.push(admin);
            }
        }
    }

    /// Whether the PostgreSQL backend is selected.
    #[must_use]
    pub fn uses_postgres(&self) -> bool {
        self.database.url.is_some()
    }
}
