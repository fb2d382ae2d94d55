//! Active session state: the loaded persona and its conversation history.
//!
//! Persona and history live behind one lock so a load swaps both together
//! and concurrent chats against the same session run one at a time.

use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use super::model::{Persona, Turn};

#[derive(Debug, Default)]
pub struct SessionState {
    persona: Option<Arc<Persona>>,
    history: Vec<Turn>,
}

impl SessionState {
    pub fn persona(&self) -> Option<&Persona> {
        self.persona.as_deref()
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    /// The turns to send for a new message: the most recent history turns
    /// followed by `pending`, `size` turns at most, oldest first.
    pub fn context_window(&self, pending: &Turn, size: usize) -> Vec<Turn> {
        let keep = size.max(1) - 1;
        let start = self.history.len().saturating_sub(keep);
        self.history[start..]
            .iter()
            .cloned()
            .chain(std::iter::once(pending.clone()))
            .collect()
    }

    /// Append a completed exchange.
    pub fn record_exchange(&mut self, user: Turn, reply: Turn) {
        self.history.push(user);
        self.history.push(reply);
    }
}

#[derive(Debug, Default)]
pub struct SessionContext {
    state: Mutex<SessionState>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the session for a read-modify-write exchange.
    pub async fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().await
    }

    /// Swap in a new persona and discard the previous history.
    /// Returns the name of the persona that was replaced, if any.
    pub async fn replace(&self, persona: Persona) -> Option<String> {
        let mut state = self.state.lock().await;
        let previous = state.persona.as_ref().map(|p| p.name.clone());
        *state = SessionState {
            persona: Some(Arc::new(persona)),
            history: Vec::new(),
        };
        previous
    }

    pub async fn active_persona(&self) -> Option<String> {
        self.state.lock().await.persona().map(|p| p.name.clone())
    }

    pub async fn history(&self) -> Vec<Turn> {
        self.state.lock().await.history.clone()
    }

    /// Active persona name and history length, read under one lock.
    pub async fn status(&self) -> (Option<String>, usize) {
        let state = self.state.lock().await;
        (state.persona().map(|p| p.name.clone()), state.history.len())
    }
}
