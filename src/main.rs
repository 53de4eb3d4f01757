mod bot;
mod config;
mod error;
mod identity;
mod llm;
mod platform;
mod prompts;
mod responder;
mod router;
#[cfg(test)]
mod testing;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::bot::AppState;
use crate::config::Config;
use crate::identity::BotIdentity;
use crate::llm::LlmClient;
use crate::platform::telegram::TelegramTransport;
use crate::responder::Responder;
use crate::router::Router;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,claria=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    info!("  Provider: {}", config.llm.provider);
    info!("  Model: {}", config.llm.model);
    info!(
        "  Max tokens: {}, temperature: {}",
        config.llm.max_tokens, config.llm.temperature
    );

    let bot = teloxide::Bot::new(&config.telegram.bot_token);

    let transport = TelegramTransport::new(bot.clone());
    let identity = BotIdentity::resolve(&transport, &config.telegram)
        .await
        .context("Failed to resolve bot identity")?;

    let provider = Arc::new(LlmClient::new(&config.llm));
    let state = Arc::new(AppState::new(
        Router::new(identity),
        Responder::new(provider, &config.llm),
    ));

    info!("Bot is starting...");
    platform::telegram::run(state, bot).await?;

    Ok(())
}
