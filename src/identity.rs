use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::TelegramConfig;
use crate::platform::MessageTransport;

/// Who the bot is. Resolved once at startup, then shared read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotIdentity {
    /// Without the leading `@`
    pub username: String,
    pub display_name: String,
    pub numeric_id: u64,
}

impl BotIdentity {
    pub fn new(username: impl Into<String>, display_name: impl Into<String>, numeric_id: u64) -> Self {
        let username = username.into();
        Self {
            username: username.trim().trim_start_matches('@').to_string(),
            display_name: display_name.into().trim().to_string(),
            numeric_id,
        }
    }

    /// Case-insensitive substring match on `@username` or the display name.
    /// Empty fields never match.
    pub fn is_mentioned_in(&self, text: &str) -> bool {
        let text = text.to_lowercase();

        let username_match = !self.username.is_empty()
            && text.contains(&format!("@{}", self.username.to_lowercase()));
        let name_match =
            !self.display_name.is_empty() && text.contains(&self.display_name.to_lowercase());

        username_match || name_match
    }

    /// Whether a command suffix such as `/start@SomeBot` targets this bot.
    pub fn is_addressed_by(&self, target: &str) -> bool {
        self.username.eq_ignore_ascii_case(target)
    }

    /// Ask the transport who we are, falling back to configured values.
    pub async fn resolve(transport: &dyn MessageTransport, fallback: &TelegramConfig) -> Result<Self> {
        let configured_username = fallback.username.clone().unwrap_or_default();
        let configured_name = fallback.display_name.clone().unwrap_or_default();

        let identity = match transport.get_identity().await {
            Ok(mut identity) => {
                if identity.username.is_empty() {
                    identity.username = Self::new(configured_username, "", 0).username;
                }
                if identity.display_name.is_empty() {
                    identity.display_name = configured_name.trim().to_string();
                }
                identity
            }
            Err(e) => {
                warn!("Runtime identity lookup failed, using configured values: {:#}", e);
                let numeric_id = fallback
                    .token_bot_id()
                    .context("Cannot derive bot id from token")?;
                if configured_username.trim().is_empty() && configured_name.trim().is_empty() {
                    anyhow::bail!("Identity lookup failed and no bot username or display name is configured");
                }
                Self::new(configured_username, configured_name, numeric_id)
            }
        };

        if identity.username.is_empty() && identity.display_name.is_empty() {
            warn!("Bot identity has neither username nor display name; mentions will never match");
        }

        info!(
            "Bot initialized: @{} ({}) id={}",
            identity.username, identity.display_name, identity.numeric_id
        );
        Ok(identity)
    }
}
