use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::Result;
use serenity::all::Http;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use instabot::application::RateLimiter;
use instabot::infrastructure::config::ConfigError;
use instabot::infrastructure::persistence;
use instabot::infrastructure::{
    AppConfig, CliArgs, ConfigStore, DiscordError, ImagePipeline, ProfileBot, SerenityUploadSink,
    build_client, init_fonts,
};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = &config.log_path {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .init();
    }

    Ok(())
}

fn load_config() -> Result<AppConfig> {
    let args = CliArgs::parse();
    let store = ConfigStore::new()?;
    let mut config = store.load_config(args.config.as_deref())?;
    config.merge_with_args(args);
    Ok(config)
}

/// Drops rate-limit entries of users who went quiet.
fn spawn_rate_limit_pruner(limiter: Arc<RateLimiter>, period: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = limiter.prune();
            debug!(removed, tracked = limiter.tracked_users(), "Rate limiter pruned");
        }
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let config = load_config()?;
    init_logging(&config)?;

    info!(version = instabot::VERSION, "Starting {}", instabot::NAME);

    let token = config
        .token
        .clone()
        .ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;

    tokio::task::spawn_blocking(init_fonts).await?;
    info!("System font database initialized");

    let profiles = persistence::connect(&config.database).await?;

    let pipeline = ImagePipeline::new(&config.cache)?;
    let sweeper = pipeline.sweeper();
    let sweep_task = sweeper.start();

    let http = Arc::new(Http::new(token.as_str()));
    let sink = Arc::new(SerenityUploadSink::new(
        http,
        config.discord.storage_channel_id,
    ));

    let rate_limiter = Arc::new(RateLimiter::from_config(config.rate_limit));
    spawn_rate_limit_pruner(
        Arc::clone(&rate_limiter),
        Duration::from_secs(config.rate_limit.window_secs.max(1)),
    );

    let bot = ProfileBot::new(
        &config,
        profiles,
        pipeline.renderer(),
        sink,
        rate_limiter,
    );

    let mut client = build_client(&token, bot).await?;
    let shard_manager = Arc::clone(&client.shard_manager);

    tokio::select! {
        result = client.start() => {
            result.map_err(|e| DiscordError::Gateway(e.to_string()))?;
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("Shutdown requested");
            shard_manager.shutdown_all().await;
        }
    }

    sweeper.stop();
    sweep_task.abort();
    let (downloads, avatars) = pipeline.stats();
    info!(%downloads, %avatars, "Stopped");

    Ok(())
}
