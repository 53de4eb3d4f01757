//! In-memory fakes for the transport and provider seams.

use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use crate::error::ProviderError;
use crate::identity::BotIdentity;
use crate::llm::{CompletionProvider, CompletionRequest};
use crate::platform::MessageTransport;

#[derive(Debug, Clone, PartialEq)]
pub struct SentReply {
    pub chat_id: i64,
    pub reply_to: Option<i32>,
    pub text: String,
}

pub struct FakeTransport {
    identity: Option<BotIdentity>,
    fail_typing: bool,
    replies: Mutex<Vec<SentReply>>,
    typing: Mutex<Vec<i64>>,
}

impl FakeTransport {
    pub fn with_identity(identity: BotIdentity) -> Self {
        Self {
            identity: Some(identity),
            fail_typing: false,
            replies: Mutex::new(Vec::new()),
            typing: Mutex::new(Vec::new()),
        }
    }

    pub fn without_identity() -> Self {
        Self {
            identity: None,
            ..Self::with_identity(BotIdentity::new("", "", 0))
        }
    }

    pub fn failing_typing(mut self) -> Self {
        self.fail_typing = true;
        self
    }

    pub fn replies(&self) -> Vec<SentReply> {
        self.replies.lock().unwrap().clone()
    }

    pub fn typing(&self) -> Vec<i64> {
        self.typing.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageTransport for FakeTransport {
    async fn send_reply(&self, chat_id: i64, reply_to: Option<i32>, text: &str) -> Result<()> {
        self.replies.lock().unwrap().push(SentReply {
            chat_id,
            reply_to,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_typing(&self, chat_id: i64) -> Result<()> {
        if self.fail_typing {
            anyhow::bail!("typing indicator rejected");
        }
        self.typing.lock().unwrap().push(chat_id);
        Ok(())
    }

    async fn get_identity(&self) -> Result<BotIdentity> {
        self.identity
            .clone()
            .ok_or_else(|| anyhow::anyhow!("getMe unavailable"))
    }
}

pub struct FakeProvider {
    reply: Option<String>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl FakeProvider {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for FakeProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.reply {
            Some(text) => Ok(text.clone()),
            None => Err(ProviderError::Api {
                status: reqwest::StatusCode::TOO_MANY_REQUESTS,
                body: "quota exceeded".to_string(),
            }),
        }
    }
}
