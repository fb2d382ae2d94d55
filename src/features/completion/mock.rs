//! Recording completion client for tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::{ChatMessage, CompletionClient};
use crate::core::{PersonaError, Result};

/// Replays scripted replies in order and records every request it sees.
///
/// Once the script runs out, the last scripted reply is repeated.
pub struct MockCompletionClient {
    script: Mutex<VecDeque<std::result::Result<String, String>>>,
    fallback: Mutex<String>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockCompletionClient {
    pub fn replying(reply: &str) -> Self {
        Self::scripted(&[reply])
    }

    pub fn scripted(replies: &[&str]) -> Self {
        Self {
            script: Mutex::new(replies.iter().map(|r| Ok(r.to_string())).collect()),
            fallback: Mutex::new(replies.last().map(|r| r.to_string()).unwrap_or_default()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a failure after the replies scripted so far.
    pub fn then_fail(self, message: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    /// Queue a reply after everything scripted so far.
    pub fn then_reply(self, reply: &str) -> Self {
        self.script.lock().unwrap().push_back(Ok(reply.to_string()));
        *self.fallback.lock().unwrap() = reply.to_string();
        self
    }

    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<Vec<ChatMessage>> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String> {
        self.requests.lock().unwrap().push(messages);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(PersonaError::Upstream(message)),
            None => Ok(self.fallback.lock().unwrap().clone()),
        }
    }
}
