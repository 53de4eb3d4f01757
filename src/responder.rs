use std::sync::Arc;

use tracing::{error, info};

use crate::config::LlmConfig;
use crate::error::ProviderError;
use crate::llm::{ChatMessage, CompletionProvider, CompletionRequest};
use crate::prompts;
use crate::router::ConversationContext;

/// Turns a user message into reply text. Never fails: provider errors
/// become the fixed apology.
pub struct Responder {
    provider: Arc<dyn CompletionProvider>,
    system_prompt: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl Responder {
    pub fn new(provider: Arc<dyn CompletionProvider>, config: &LlmConfig) -> Self {
        Self {
            provider,
            system_prompt: config.system_prompt.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    /// `[system persona] + context + [user]`
    pub fn build_messages(
        &self,
        user_text: &str,
        context: Option<&ConversationContext>,
    ) -> Vec<ChatMessage> {
        let mut messages = vec![ChatMessage::system(self.system_prompt.clone())];
        if let Some(context) = context {
            messages.extend(context.turns().iter().cloned());
        }
        messages.push(ChatMessage::user(user_text));
        messages
    }

    pub async fn respond(&self, user_text: &str, context: Option<&ConversationContext>) -> String {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: self.build_messages(user_text, context),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        match self.provider.complete(&request).await {
            Ok(text) if text.trim().is_empty() => {
                error!("Completion failed: {}", ProviderError::EmptyResponse);
                prompts::APOLOGY.to_string()
            }
            Ok(text) => {
                let preview: String = text.chars().take(100).collect();
                info!("Completion received: {}", preview);
                text
            }
            Err(e) => {
                error!("Completion failed: {:#}", e);
                prompts::APOLOGY.to_string()
            }
        }
    }
}
