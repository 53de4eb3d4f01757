use anyhow::Result;
use tracing::{debug, info, warn};

use crate::platform::{IncomingMessage, MessageTransport};
use crate::prompts;
use crate::responder::Responder;
use crate::router::{Route, Router};

/// Shared application state
pub struct AppState {
    router: Router,
    responder: Responder,
}

impl AppState {
    pub fn new(router: Router, responder: Responder) -> Self {
        Self { router, responder }
    }

    /// Route one inbound message and send whatever reply it calls for.
    pub async fn process(&self, transport: &dyn MessageTransport, msg: &IncomingMessage) -> Result<()> {
        match self.router.route(msg) {
            Route::Ignore => {
                debug!("Ignoring message {} in chat {}", msg.message_id, msg.chat_id);
                Ok(())
            }
            Route::GroupsOnly => {
                info!("Sending groups-only notice to chat {}", msg.chat_id);
                transport
                    .send_reply(msg.chat_id, Some(msg.message_id), prompts::GROUPS_ONLY_NOTICE)
                    .await
            }
            Route::Welcome => {
                info!("Sending welcome to group {}", msg.chat_id);
                transport
                    .send_reply(msg.chat_id, Some(msg.message_id), prompts::WELCOME)
                    .await
            }
            Route::Respond(context) => {
                info!(
                    "Bot addressed by {} ({}) in chat {}: {}",
                    msg.sender_name, msg.sender_id, msg.chat_id, msg.text
                );

                if let Err(e) = transport.send_typing(msg.chat_id).await {
                    warn!("Failed to send typing indicator: {:#}", e);
                }

                let reply = self.responder.respond(&msg.text, context.as_ref()).await;
                transport
                    .send_reply(msg.chat_id, Some(msg.message_id), &reply)
                    .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::config::LlmConfig;
    use crate::identity::BotIdentity;
    use crate::llm::ChatMessage;
    use crate::platform::{ChatType, ReplyTo};
    use crate::testing::{FakeProvider, FakeTransport, SentReply};

    const BOT_ID: u64 = 4242;

    fn identity() -> BotIdentity {
        BotIdentity::new("BotName", "Clar", BOT_ID)
    }

    fn state(provider: Arc<FakeProvider>) -> AppState {
        AppState::new(
            Router::new(identity()),
            Responder::new(provider, &LlmConfig::default()),
        )
    }

    fn message(chat_type: ChatType, text: &str) -> IncomingMessage {
        IncomingMessage {
            chat_id: -1001,
            message_id: 77,
            chat_type,
            sender_id: 12,
            sender_name: "Pepe".to_string(),
            text: text.to_string(),
            reply_to: None,
        }
    }

    #[tokio::test]
    async fn test_mention_in_group_relays_provider_reply() {
        let provider = Arc::new(FakeProvider::replying("¡Asere, qué bolá!"));
        let transport = FakeTransport::with_identity(identity());

        state(provider.clone())
            .process(&transport, &message(ChatType::Group, "hola @BotName qué bolá"))
            .await
            .unwrap();

        assert_eq!(transport.typing(), vec![-1001]);
        assert_eq!(
            transport.replies(),
            vec![SentReply {
                chat_id: -1001,
                reply_to: Some(77),
                text: "¡Asere, qué bolá!".to_string(),
            }]
        );
        assert_eq!(provider.requests()[0].messages.len(), 2);
    }

    #[tokio::test]
    async fn test_reply_to_bot_without_mention_uses_assistant_context() {
        let provider = Arc::new(FakeProvider::replying("¡A ti, compañero!"));
        let transport = FakeTransport::with_identity(identity());
        let mut msg = message(ChatType::Supergroup, "gracias");
        msg.reply_to = Some(ReplyTo {
            text: "Fidel era un cojonú".to_string(),
            sender_id: BOT_ID,
            sender_name: "Clar".to_string(),
            is_from_bot: true,
        });

        state(provider.clone()).process(&transport, &msg).await.unwrap();

        let messages = &provider.requests()[0].messages;
        assert_eq!(messages[1], ChatMessage::assistant("Fidel era un cojonú"));
        assert_eq!(messages[2], ChatMessage::user("gracias"));
        assert_eq!(transport.replies()[0].text, "¡A ti, compañero!");
    }

    #[tokio::test]
    async fn test_direct_chat_gets_notice_without_provider_call() {
        let provider = Arc::new(FakeProvider::replying("no debería"));
        let transport = FakeTransport::with_identity(identity());

        state(provider.clone())
            .process(&transport, &message(ChatType::Direct, "hola @BotName"))
            .await
            .unwrap();

        assert!(provider.requests().is_empty());
        assert!(transport.typing().is_empty());
        assert_eq!(transport.replies()[0].text, prompts::GROUPS_ONLY_NOTICE);
    }

    #[tokio::test]
    async fn test_unmentioned_group_message_is_silent() {
        let provider = Arc::new(FakeProvider::replying("no debería"));
        let transport = FakeTransport::with_identity(identity());

        state(provider.clone())
            .process(&transport, &message(ChatType::Group, "buenos días a todos"))
            .await
            .unwrap();

        assert!(provider.requests().is_empty());
        assert!(transport.replies().is_empty());
    }

    #[tokio::test]
    async fn test_provider_failure_surfaces_apology_in_chat() {
        let transport = FakeTransport::with_identity(identity());

        state(Arc::new(FakeProvider::failing()))
            .process(&transport, &message(ChatType::Group, "@BotName dime algo"))
            .await
            .unwrap();

        assert_eq!(transport.replies()[0].text, prompts::APOLOGY);
    }

    #[tokio::test]
    async fn test_blank_completion_surfaces_apology_in_chat() {
        let transport = FakeTransport::with_identity(identity());

        state(Arc::new(FakeProvider::replying("")))
            .process(&transport, &message(ChatType::Group, "@BotName dime algo"))
            .await
            .unwrap();

        assert_eq!(transport.replies()[0].text, prompts::APOLOGY);
    }

    #[tokio::test]
    async fn test_typing_failure_does_not_block_reply() {
        let transport = FakeTransport::with_identity(identity()).failing_typing();

        state(Arc::new(FakeProvider::replying("aquí estoy")))
            .process(&transport, &message(ChatType::Group, "clar?"))
            .await
            .unwrap();

        assert_eq!(transport.replies()[0].text, "aquí estoy");
    }

    #[tokio::test]
    async fn test_start_in_group_sends_welcome() {
        let provider = Arc::new(FakeProvider::replying("no debería"));
        let transport = FakeTransport::with_identity(identity());

        state(provider.clone())
            .process(&transport, &message(ChatType::Group, "/start"))
            .await
            .unwrap();

        assert!(provider.requests().is_empty());
        assert_eq!(transport.replies()[0].text, prompts::WELCOME);
    }
}
