use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "instabot",
    version,
    about = "Discord bot for Instagram-style profile galleries",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH", env = "INSTABOT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum, env = "INSTABOT_LOG_LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Discord bot token.
    #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// PostgreSQL connection URL. Selects the PostgreSQL backend.
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// SQLite database file.
    #[arg(long, value_name = "PATH")]
    pub sqlite_path: Option<PathBuf>,

    /// Channel receiving uploads and profile backups.
    #[arg(long, env = "DATABASE_CHANNEL_ID")]
    pub storage_channel_id: Option<u64>,

    /// Role allowed to edit profiles.
    #[arg(long, env = "ALLOWED_ROLE_ID")]
    pub allowed_role_id: Option<u64>,

    /// Additional admin user id. Repeatable.
    #[arg(long = "admin-id", value_name = "ID")]
    pub admin_ids: Vec<u64>,
}
