use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatAction, MessageId, ReplyParameters};
use tracing::{debug, error, info, warn};

use crate::bot::AppState;
use crate::identity::BotIdentity;
use crate::platform::{ChatType, IncomingMessage, MessageTransport, ReplyTo};

/// Telegram caps a message at 4096 characters
const MAX_MESSAGE_LEN: usize = 4000;

/// Split long messages for Telegram's 4096 char limit
fn split_message(text: &str, max_len: usize) -> Vec<String> {
    if text.len() <= max_len {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let mut end = (start + max_len).min(text.len());
        // Walk back to a valid UTF-8 char boundary so slicing doesn't panic
        while end > start && !text.is_char_boundary(end) {
            end -= 1;
        }
        let actual_end = if end < text.len() {
            text[start..end]
                .rfind('\n')
                .or_else(|| text[start..end].rfind(' '))
                .map(|pos| start + pos + 1)
                .unwrap_or(end)
        } else {
            end
        };

        chunks.push(text[start..actual_end].to_string());
        start = actual_end;
    }

    chunks
}

/// `MessageTransport` backed by the Telegram Bot API
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl MessageTransport for TelegramTransport {
    async fn send_reply(&self, chat_id: i64, reply_to: Option<i32>, text: &str) -> Result<()> {
        for chunk in split_message(text, MAX_MESSAGE_LEN) {
            let mut request = self.bot.send_message(ChatId(chat_id), chunk);
            if let Some(message_id) = reply_to {
                request = request.reply_parameters(ReplyParameters::new(MessageId(message_id)));
            }
            request
                .await
                .with_context(|| format!("Failed to send message to chat {}", chat_id))?;
        }
        Ok(())
    }

    async fn send_typing(&self, chat_id: i64) -> Result<()> {
        self.bot
            .send_chat_action(ChatId(chat_id), ChatAction::Typing)
            .await
            .context("Failed to send typing action")?;
        Ok(())
    }

    async fn get_identity(&self) -> Result<BotIdentity> {
        let me = self.bot.get_me().await.context("getMe failed")?;
        Ok(BotIdentity::new(
            me.user.username.clone().unwrap_or_default(),
            me.user.first_name.clone(),
            me.user.id.0,
        ))
    }
}

/// Convert a Telegram message into the platform-agnostic form.
/// Returns `None` for anything the bot does not handle (non-text, no sender, channels).
fn to_incoming(msg: &Message) -> Option<IncomingMessage> {
    let text = msg.text()?.to_string();
    let sender = msg.from.as_ref()?;

    let chat_type = if msg.chat.is_private() {
        ChatType::Direct
    } else if msg.chat.is_supergroup() {
        ChatType::Supergroup
    } else if msg.chat.is_group() {
        ChatType::Group
    } else {
        return None;
    };

    let reply_to = msg.reply_to_message().and_then(|replied| {
        let text = replied.text().or_else(|| replied.caption())?;
        let from = replied.from.as_ref()?;
        Some(ReplyTo {
            text: text.to_string(),
            sender_id: from.id.0,
            sender_name: from.full_name(),
            is_from_bot: from.is_bot,
        })
    });

    Some(IncomingMessage {
        chat_id: msg.chat.id.0,
        message_id: msg.id.0,
        chat_type,
        sender_id: sender.id.0,
        sender_name: sender.full_name(),
        text,
        reply_to,
    })
}

/// Run the Telegram bot platform
pub async fn run(state: Arc<AppState>, bot: Bot) -> Result<()> {
    info!("Starting Telegram platform...");
    info!("Group privacy mode must be DISABLED in @BotFather for the bot to see group messages");
    info!("  /mybots -> select the bot -> Bot Settings -> Group Privacy -> Turn off");

    let handler = Update::filter_message().endpoint(handle_message);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("telegram"))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn handle_message(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    debug!("Update received: chat={} message={}", msg.chat.id.0, msg.id.0);

    let incoming = match to_incoming(&msg) {
        Some(incoming) => incoming,
        None => {
            debug!("Not a text message from a user, ignoring");
            return Ok(());
        }
    };

    let transport = TelegramTransport::new(bot);
    if let Err(e) = state.process(&transport, &incoming).await {
        error!("Error processing message in chat {}: {:#}", incoming.chat_id, e);
    }

    Ok(())
}
