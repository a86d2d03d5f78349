//! Per-problem chat history, session flags, and credential access.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::warn;

use algomentor_protocols::{ChatMessage, KeyValueStore, ProblemId, StoreError};

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;

const API_KEY: &str = "geminiApiKey";

fn chat_key(id: &ProblemId) -> String {
    format!("chat_{}", id)
}

fn first_message_key(id: &ProblemId) -> String {
    format!("firstMessage_{}", id)
}

/// Chat-history layer over a [`KeyValueStore`].
///
/// History for a problem is append-only except for an explicit `clear`.
/// The backing store has no append primitive, so `append` rewrites the
/// full sequence; an internal mutex serializes those read-modify-write
/// cycles so two appends for the same key can never interleave.
pub struct ChatHistoryStore {
    store: Arc<dyn KeyValueStore>,
    append_lock: Mutex<()>,
}

impl ChatHistoryStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            append_lock: Mutex::new(()),
        }
    }

    /// Ordered message sequence for a problem.
    ///
    /// Fails soft: an absent key, a store error, or an undecodable stored
    /// value all yield an empty history.
    pub async fn history(&self, id: &ProblemId) -> Vec<ChatMessage> {
        let value = match self.store.get(&chat_key(id)).await {
            Ok(Some(value)) => value,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read history for problem {}: {}", id, e);
                return Vec::new();
            }
        };

        match serde_json::from_value(value) {
            Ok(messages) => messages,
            Err(e) => {
                warn!("Discarding undecodable history for problem {}: {}", id, e);
                Vec::new()
            }
        }
    }

    /// Append one message, persisting the full updated sequence.
    ///
    /// Read-your-writes: the write has completed when this returns.
    pub async fn append(&self, id: &ProblemId, message: ChatMessage) -> Result<(), StoreError> {
        let _guard = self.append_lock.lock().await;

        let mut messages = self.history(id).await;
        messages.push(message);
        self.store
            .set(&chat_key(id), serde_json::to_value(&messages)?)
            .await
    }

    /// Drop the persisted sequence entirely.
    pub async fn clear(&self, id: &ProblemId) -> Result<(), StoreError> {
        self.store.remove(&chat_key(id)).await
    }

    /// Whether no message has ever been sent for this problem.
    ///
    /// An absent flag reads as `true`.
    pub async fn is_first_message(&self, id: &ProblemId) -> bool {
        match self.store.get(&first_message_key(id)).await {
            Ok(Some(value)) => value.as_bool().unwrap_or(false),
            Ok(None) => true,
            Err(e) => {
                warn!("Failed to read first-message flag for {}: {}", id, e);
                true
            }
        }
    }

    /// Record that a message has been sent; the flag reads `false` from
    /// here on.
    pub async fn mark_messaged(&self, id: &ProblemId) -> Result<(), StoreError> {
        self.store
            .set(&first_message_key(id), Value::Bool(false))
            .await
    }

    /// Forget the flag so the next message re-sends problem context.
    pub async fn reset_first_message(&self, id: &ProblemId) -> Result<(), StoreError> {
        self.store.remove(&first_message_key(id)).await
    }

    /// Stored API credential, if any.
    pub async fn api_key(&self) -> Option<String> {
        match self.store.get(API_KEY).await {
            Ok(Some(value)) => value.as_str().map(str::to_string),
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to read API key: {}", e);
                None
            }
        }
    }

    pub async fn set_api_key(&self, value: &str) -> Result<(), StoreError> {
        self.store.set(API_KEY, Value::String(value.to_string())).await
    }

    pub async fn remove_api_key(&self) -> Result<(), StoreError> {
        self.store.remove(API_KEY).await
    }
}
