//! Discord adapter: gateway client, commands and interactions.

mod bot;
mod commands;
mod delivery;
mod interactions;
mod text;
mod upload_sink;

use serenity::all::{Client, GatewayIntents, HttpError};
use thiserror::Error;
use tracing::{debug, info, warn};

pub use bot::ProfileBot;
pub use upload_sink::SerenityUploadSink;

use crate::domain::entities::BotToken;

/// Unknown interaction and interaction already acknowledged.
const STALE_INTERACTION_CODES: [isize; 2] = [10062, 40060];

/// Discord adapter errors.
#[derive(Debug, Error)]
pub enum DiscordError {
    /// The client could not be built.
    #[error("failed to create Discord client: {0}")]
    Client(String),
    /// The gateway connection ended with an error.
    #[error("Discord client stopped: {0}")]
    Gateway(String),
}

/// Builds the gateway client around `bot`.
///
/// # Errors
/// Returns [`DiscordError::Client`] if serenity rejects the setup.
pub async fn build_client(token: &BotToken, bot: ProfileBot) -> Result<Client, DiscordError> {
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    info!(token = %token.masked(), "Creating Discord client");

    Client::builder(token.as_str(), intents)
        .event_handler(bot)
        .await
        .map_err(|e| DiscordError::Client(e.to_string()))
}

/// Whether `err` only says the interaction expired or was already answered.
fn is_stale_interaction(err: &serenity::Error) -> bool {
    matches!(
        err,
        serenity::Error::Http(HttpError::UnsuccessfulRequest(response))
            if STALE_INTERACTION_CODES.contains(&response.error.code)
    )
}

fn log_send_error(err: &serenity::Error) {
    if is_stale_interaction(err) {
        debug!(error = %err, "Interaction expired or already acknowledged");
    } else {
        warn!(error = %err, "Failed to respond on Discord");
    }
}

fn log_response_error<T>(result: serenity::Result<T>) {
    if let Err(e) = result {
        log_send_error(&e);
    }
}
