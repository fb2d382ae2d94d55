//! OpenAI chat completion backend
//!
//! Credentials are read by the `openai` crate from `OPENAI_API_KEY` /
//! `OPENAI_KEY`; see `Config::export_openai_credentials`.

use async_trait::async_trait;
use log::debug;
use openai::chat::{ChatCompletion, ChatCompletionMessage, ChatCompletionMessageRole};

use super::{ChatMessage, CompletionClient, Role};
use crate::core::{PersonaError, Result};

/// Completion client backed by the OpenAI chat completions API
#[derive(Debug, Clone)]
pub struct OpenAiCompletionClient {
    model: String,
}

impl OpenAiCompletionClient {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

fn to_openai_message(message: ChatMessage) -> ChatCompletionMessage {
    let role = match message.role {
        Role::System => ChatCompletionMessageRole::System,
        Role::User => ChatCompletionMessageRole::User,
        Role::Assistant => ChatCompletionMessageRole::Assistant,
    };

    ChatCompletionMessage {
        role,
        content: Some(message.content),
        name: None,
        function_call: None,
        tool_call_id: None,
        tool_calls: None,
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompletionClient {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String> {
        debug!(
            "Requesting completion from {} with {} messages",
            self.model,
            messages.len()
        );

        let messages: Vec<ChatCompletionMessage> =
            messages.into_iter().map(to_openai_message).collect();

        let completion = ChatCompletion::builder(&self.model, messages)
            .create()
            .await
            .map_err(|e| PersonaError::Upstream(format!("OpenAI API error: {e}")))?;

        completion
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| PersonaError::Upstream("No response from OpenAI".to_string()))
    }
}
