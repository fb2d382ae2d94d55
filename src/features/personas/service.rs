//! # Feature: Persona Service
//!
//! Role-plays a stored persona. One persona is active at a time; each chat
//! message is sent with the persona's system prompt and a bounded window of
//! the most recent conversation turns.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial release with load, chat and list operations

use log::{debug, info};
use std::sync::Arc;

use super::model::Turn;
use super::prompt_builder::PromptBuilder;
use super::session::SessionContext;
use super::store::PersonaStore;
use crate::core::{PersonaError, Result};
use crate::features::completion::CompletionClient;

/// Number of conversation turns sent with each chat request, new message included
pub const HISTORY_WINDOW: usize = 5;

pub struct PersonaService {
    completion: Arc<dyn CompletionClient>,
    store: Arc<dyn PersonaStore>,
    session: SessionContext,
}

impl PersonaService {
    pub fn new(completion: Arc<dyn CompletionClient>, store: Arc<dyn PersonaStore>) -> Self {
        Self {
            completion,
            store,
            session: SessionContext::new(),
        }
    }

    /// Make `name` the active persona, discarding the current conversation.
    ///
    /// A missing or unreadable record leaves the current session untouched.
    pub async fn load_persona(&self, name: &str) -> Result<String> {
        let persona = self.store.load(name).await?;
        let previous = self.session.replace(persona).await;

        match previous {
            Some(prev) => info!("Loaded persona {name} (replacing {prev})"),
            None => info!("Loaded persona {name}"),
        }
        Ok(format!("Loaded persona for {name}"))
    }

    /// Send a message to the active persona and return its reply.
    ///
    /// The exchange is recorded only when the completion succeeds, so a failed
    /// chat leaves the history as it was.
    pub async fn chat(&self, message: &str) -> Result<String> {
        let mut state = self.session.lock().await;
        let persona = state
            .persona()
            .ok_or_else(|| PersonaError::InvalidState("Persona not loaded".to_string()))?;

        let user_turn = Turn::user(message);
        let window = state.context_window(&user_turn, HISTORY_WINDOW);
        let messages = PromptBuilder::new(persona).with_history(&window).build();
        debug!(
            "Chat with {} using {} context turns ({} in history)",
            persona.name,
            window.len(),
            state.history().len()
        );

        let reply = self.completion.complete(messages).await?;
        state.record_exchange(user_turn, Turn::assistant(reply.clone()));
        Ok(reply)
    }

    pub async fn list_personas(&self) -> Result<Vec<String>> {
        self.store.list().await
    }

    pub async fn active_persona(&self) -> Option<String> {
        self.session.active_persona().await
    }

    pub async fn history(&self) -> Vec<Turn> {
        self.session.history().await
    }

    /// Active persona and turn count as one consistent snapshot
    pub async fn status(&self) -> (Option<String>, usize) {
        self.session.status().await
    }
}
