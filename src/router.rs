use tracing::debug;

use crate::identity::BotIdentity;
use crate::llm::ChatMessage;
use crate::platform::IncomingMessage;

/// Prior turns attached ahead of the triggering message.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationContext {
    turns: Vec<ChatMessage>,
}

impl ConversationContext {
    pub fn single(turn: ChatMessage) -> Self {
        Self { turns: vec![turn] }
    }

    pub fn turns(&self) -> &[ChatMessage] {
        &self.turns
    }
}

/// What to do with one inbound message
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Ignore,
    /// Direct chat: answer with the static notice, never call the provider
    GroupsOnly,
    /// `/start` inside a group
    Welcome,
    Respond(Option<ConversationContext>),
}

/// Decides per message whether the bot speaks, and with what context.
pub struct Router {
    identity: BotIdentity,
}

impl Router {
    pub fn new(identity: BotIdentity) -> Self {
        Self { identity }
    }

    fn is_reply_to_self(&self, msg: &IncomingMessage) -> bool {
        msg.reply_to
            .as_ref()
            .is_some_and(|r| r.sender_id == self.identity.numeric_id)
    }

    /// Group chats only; then either a reply to the bot or a mention.
    pub fn should_respond(&self, msg: &IncomingMessage) -> bool {
        if !msg.chat_type.is_group() {
            return false;
        }
        self.is_reply_to_self(msg) || self.identity.is_mentioned_in(&msg.text)
    }

    /// One turn of context from the replied-to message, if any.
    /// Deeper reply chains are not followed.
    pub fn build_context(&self, msg: &IncomingMessage) -> Option<ConversationContext> {
        let reply = msg.reply_to.as_ref()?;
        let turn = if reply.sender_id == self.identity.numeric_id {
            ChatMessage::assistant(reply.text.clone())
        } else {
            ChatMessage::user(format!("{}: {}", reply.sender_name, reply.text))
        };
        Some(ConversationContext::single(turn))
    }

    pub fn route(&self, msg: &IncomingMessage) -> Route {
        let text = msg.text.trim();
        if text.is_empty() {
            return Route::Ignore;
        }

        if let Some(command) = text.strip_prefix('/') {
            if command.starts_with(|c: char| c.is_ascii_alphanumeric() || c == '_') {
                return self.route_command(msg, command);
            }
        }

        if !msg.chat_type.is_group() {
            debug!("Message from {:?} chat {}, sending groups-only notice", msg.chat_type, msg.chat_id);
            return Route::GroupsOnly;
        }

        if !self.should_respond(msg) {
            if let Some(reply) = msg.reply_to.as_ref().filter(|r| r.is_from_bot) {
                debug!(
                    "Reply to another bot ({}) without mention in chat {}, ignoring",
                    reply.sender_id, msg.chat_id
                );
                return Route::Ignore;
            }
            debug!("Bot not mentioned in chat {}, ignoring", msg.chat_id);
            return Route::Ignore;
        }

        Route::Respond(self.build_context(msg))
    }

    fn route_command(&self, msg: &IncomingMessage, command: &str) -> Route {
        let token = command.split_whitespace().next().unwrap_or_default();
        let (name, target) = match token.split_once('@') {
            Some((name, target)) => (name, Some(target)),
            None => (token, None),
        };

        if target.is_some_and(|t| !self.identity.is_addressed_by(t)) {
            return Route::Ignore;
        }

        match name {
            "start" if msg.chat_type.is_group() => Route::Welcome,
            "start" => Route::GroupsOnly,
            _ => Route::Ignore,
        }
    }
}
