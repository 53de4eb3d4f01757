pub mod telegram;

use anyhow::Result;
use async_trait::async_trait;

use crate::identity::BotIdentity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatType {
    Direct,
    Group,
    Supergroup,
}

impl ChatType {
    pub fn is_group(self) -> bool {
        matches!(self, ChatType::Group | ChatType::Supergroup)
    }
}

/// The message an inbound message replies to
#[derive(Debug, Clone)]
pub struct ReplyTo {
    pub text: String,
    pub sender_id: u64,
    pub sender_name: String,
    /// Sent by any bot account, not necessarily this one
    pub is_from_bot: bool,
}

/// A text message received from the chat platform
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub chat_id: i64,
    pub message_id: i32,
    pub chat_type: ChatType,
    pub sender_id: u64,
    pub sender_name: String,
    pub text: String,
    pub reply_to: Option<ReplyTo>,
}

/// Outbound operations the bot needs from a chat platform.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    async fn send_reply(&self, chat_id: i64, reply_to: Option<i32>, text: &str) -> Result<()>;

    async fn send_typing(&self, chat_id: i64) -> Result<()>;

    async fn get_identity(&self) -> Result<BotIdentity>;
}
