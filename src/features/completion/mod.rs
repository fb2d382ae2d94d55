//! # Feature: Completion Client
//!
//! Boundary to the external text-generation service. Callers hand over an
//! ordered list of role-tagged messages and get one reply back. Errors are
//! not classified or retried here; they surface as `PersonaError::Upstream`.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial release with the OpenAI chat completion backend

pub mod openai_client;

#[cfg(test)]
pub mod mock;

pub use openai_client::OpenAiCompletionClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::Result;

/// Role of a message in a completion request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One role-tagged message sent to the completion service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Text-generation capability consumed by the builder and the service.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send the messages in order and return the generated reply text.
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String>;
}
