//! Session store — bounded dialogue history keyed by an opaque id.
//!
//! History is trimmed by whole exchanges: once a session holds more than
//! `2 * max_history` messages the two oldest are dropped together.

use lectern_core::LecternError;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// One dialogue turn. `role` is open-ended ("user", "assistant", "system", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }
}

pub struct SessionStore {
    max_history: usize,
    sessions: RwLock<HashMap<String, Vec<Message>>>,
}

impl SessionStore {
    /// `max_history` counts exchanges; 0 disables history entirely.
    pub fn new(max_history: usize) -> Self {
        Self {
            max_history,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }

    /// Create an empty session and return its id (128 random bits, hex).
    pub async fn create_session(&self) -> String {
        let mut sessions = self.sessions.write().await;
        loop {
            let id = new_session_id();
            if let Entry::Vacant(slot) = sessions.entry(id.clone()) {
                slot.insert(Vec::new());
                tracing::debug!("Created session {}", id);
                return id;
            }
        }
    }

    pub async fn add_message(
        &self,
        session_id: &str,
        role: &str,
        content: &str,
    ) -> Result<(), LecternError> {
        let mut sessions = self.sessions.write().await;
        let history = sessions
            .get_mut(session_id)
            .ok_or_else(|| LecternError::SessionNotFound(session_id.to_string()))?;
        self.push_trimmed(session_id, history, Message::new(role, content));
        Ok(())
    }

    /// Append a user message and the assistant's reply under one lock.
    pub async fn add_exchange(
        &self,
        session_id: &str,
        user: &str,
        assistant: &str,
    ) -> Result<(), LecternError> {
        let mut sessions = self.sessions.write().await;
        let history = sessions
            .get_mut(session_id)
            .ok_or_else(|| LecternError::SessionNotFound(session_id.to_string()))?;
        self.push_trimmed(session_id, history, Message::user(user));
        self.push_trimmed(session_id, history, Message::assistant(assistant));
        Ok(())
    }

    fn push_trimmed(&self, session_id: &str, history: &mut Vec<Message>, message: Message) {
        history.push(message);
        if history.len() > self.max_history * 2 {
            let excess = history.len().min(2);
            history.drain(..excess);
            tracing::debug!("Trimmed session {} to {} message(s)", session_id, history.len());
            if history.len() % 2 != 0 {
                // Unpaired roles; pairs are still dropped two at a time.
                tracing::warn!(
                    "Session {} holds an odd number of messages ({})",
                    session_id,
                    history.len()
                );
            }
        }
    }

    /// Stored history, oldest first. Missing ids are an error.
    pub async fn get_history(&self, session_id: &str) -> Result<Vec<Message>, LecternError> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| LecternError::SessionNotFound(session_id.to_string()))
    }

    pub async fn exists(&self, session_id: &str) -> bool {
        self.sessions.read().await.contains_key(session_id)
    }

    /// Returns false when the id was unknown.
    pub async fn delete(&self, session_id: &str) -> bool {
        let removed = self.sessions.write().await.remove(session_id).is_some();
        if removed {
            tracing::debug!("Deleted session {}", session_id);
        }
        removed
    }

    pub async fn clear_all(&self) {
        self.sessions.write().await.clear();
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// `"{role}: {content}"` per message, newline-joined.
    pub async fn formatted_history(&self, session_id: &str) -> Result<String, LecternError> {
        let history = self.get_history(session_id).await?;
        Ok(history
            .iter()
            .map(|m| format!("{}: {}", m.role, m.content))
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

fn new_session_id() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
