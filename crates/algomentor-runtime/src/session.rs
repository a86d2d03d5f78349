//! Chat session controller.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use algomentor_protocols::{
    ChatMessage, CompletionError, CompletionPayload, CompletionProvider, ProblemId,
    SettingsNotice, WidgetState, WidgetSurface,
};
use algomentor_store::ChatHistoryStore;

use crate::context::ContextCache;
use crate::prompt::augment_with_context;

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;

const MISSING_KEY_NOTICE: &str =
    "Please set your Gemini API key in the extension settings first.";
const CLEARED_NOTICE: &str = "Chat history cleared.";
const ERROR_PREFIX: &str = "Sorry, I encountered an error";

/// Result of one [`ChatSession::send`] cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Assistant reply persisted (and rendered when the panel is live).
    Completed,
    /// Provider failure rendered locally; nothing persisted for it.
    Failed,
    /// Empty input; no-op.
    EmptyMessage,
    /// No problem id resolvable for the current page; no-op.
    NoProblem,
    /// No credential configured; instructional notice rendered,
    /// history untouched.
    MissingApiKey,
    /// Another send is in flight for this panel; rejected.
    Busy,
}

enum CredentialCache {
    Unresolved,
    Missing,
    Present(String),
}

/// Mediates send/receive cycles and owns the widget open/close
/// transitions.
///
/// The per-cycle state machine is `Idle -> Sending -> (Success | Failed)
/// -> Idle`; `Sending` is materialized by the send guard, so a second
/// send while one is pending is rejected rather than interleaved and
/// the persisted ordering stays correct.
pub struct ChatSession {
    history: Arc<ChatHistoryStore>,
    context: Arc<ContextCache>,
    provider: Arc<dyn CompletionProvider>,
    surface: Arc<dyn WidgetSurface>,
    problem_id: RwLock<Option<ProblemId>>,
    widget: RwLock<WidgetState>,
    credential: RwLock<CredentialCache>,
    send_guard: Mutex<()>,
}

impl ChatSession {
    pub fn new(
        history: Arc<ChatHistoryStore>,
        context: Arc<ContextCache>,
        provider: Arc<dyn CompletionProvider>,
        surface: Arc<dyn WidgetSurface>,
    ) -> Self {
        Self {
            history,
            context,
            provider,
            surface,
            problem_id: RwLock::new(None),
            widget: RwLock::new(WidgetState::Hidden),
            credential: RwLock::new(CredentialCache::Unresolved),
            send_guard: Mutex::new(()),
        }
    }

    pub fn widget_state(&self) -> WidgetState {
        *self.widget.read()
    }

    pub fn problem_id(&self) -> Option<ProblemId> {
        self.problem_id.read().clone()
    }

    /// Adopt the route the watcher just landed on.
    pub fn set_route(&self, path: &str, state: WidgetState) {
        *self.problem_id.write() = ProblemId::from_path(path);
        *self.widget.write() = state;
    }

    /// Refresh the cached credential without a page reload.
    pub fn apply_settings_notice(&self, notice: SettingsNotice) {
        *self.credential.write() = match notice {
            SettingsNotice::ApiKeyUpdated { value } => CredentialCache::Present(value),
            SettingsNotice::ApiKeyRemoved => CredentialCache::Missing,
        };
    }

    /// Open the chat panel, rendering prior history in original order.
    ///
    /// With no resolvable problem id the panel still opens but input is
    /// disabled. A missing host container leaves everything untouched.
    pub async fn open(&self) -> WidgetState {
        if !self.surface.mount_panel() {
            return self.widget_state();
        }
        self.surface.remove_button();

        let problem_id = self.problem_id();
        if let Some(id) = &problem_id {
            for message in self.history.history(id).await {
                self.surface.render_message(&message);
            }
        }
        self.surface.set_input_enabled(problem_id.is_some());

        *self.widget.write() = WidgetState::ChatOpen;
        self.widget_state()
    }

    /// Run one send/receive cycle.
    pub async fn send(&self, text: &str) -> SendOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::EmptyMessage;
        }
        let Some(id) = self.problem_id() else {
            return SendOutcome::NoProblem;
        };

        let Ok(_guard) = self.send_guard.try_lock() else {
            debug!("Rejected send while one is pending for problem {}", id);
            return SendOutcome::Busy;
        };

        let Some(api_key) = self.resolve_credential().await else {
            self.surface.render_notice(MISSING_KEY_NOTICE);
            return SendOutcome::MissingApiKey;
        };

        // Optimistic: the user's message is persisted and shown before
        // the provider answers.
        let user_message = ChatMessage::user(text);
        if let Err(e) = self.history.append(&id, user_message.clone()).await {
            warn!("Failed to persist user message for {}: {}", id, e);
        }
        self.surface.render_message(&user_message);

        let payload = if self.history.is_first_message(&id).await {
            let context = self.context.get(&id);
            CompletionPayload::Text(augment_with_context(context.as_ref(), text))
        } else {
            CompletionPayload::Text(text.to_string())
        };
        if let Err(e) = self.history.mark_messaged(&id).await {
            warn!("Failed to persist first-message flag for {}: {}", id, e);
        }

        self.surface.set_pending(true);

        let result = self.provider.complete(&payload, &api_key).await;

        // The panel may have been torn down while the request was in
        // flight; persistence still happens, rendering does not.
        let live = self.surface.is_live();
        if live {
            self.surface.set_pending(false);
        }

        match result {
            Ok(reply) => {
                let assistant_message = ChatMessage::assistant(reply);
                if let Err(e) = self.history.append(&id, assistant_message.clone()).await {
                    warn!("Failed to persist assistant message for {}: {}", id, e);
                }
                if live {
                    self.surface.render_message(&assistant_message);
                } else {
                    debug!("Panel detached before completion for problem {}", id);
                }
                SendOutcome::Completed
            }
            Err(e) => {
                let cause = match &e {
                    CompletionError::Api { message, .. } => message.clone(),
                    CompletionError::Network(cause) => cause.clone(),
                    CompletionError::MalformedResponse(detail) => {
                        warn!("Completion returned malformed body: {}", detail);
                        "Invalid API response".to_string()
                    }
                };
                if live {
                    self.surface
                        .render_notice(&format!("{}: {}", ERROR_PREFIX, cause));
                }
                SendOutcome::Failed
            }
        }
    }

    /// Clear persisted history after explicit confirmation.
    ///
    /// Also forgets the first-message flag so the next message re-sends
    /// problem context into a now-empty conversation.
    pub async fn clear(&self) -> bool {
        let Some(id) = self.problem_id() else {
            return false;
        };
        if !self.surface.confirm_clear() {
            debug!("Clear cancelled for problem {}", id);
            return false;
        }

        if let Err(e) = self.history.clear(&id).await {
            warn!("Failed to clear history for {}: {}", id, e);
            return false;
        }
        if let Err(e) = self.history.reset_first_message(&id).await {
            warn!("Failed to reset first-message flag for {}: {}", id, e);
        }

        self.surface.clear_messages();
        self.surface.render_notice(CLEARED_NOTICE);
        info!("Cleared chat history for problem {}", id);
        true
    }

    /// Close the panel and restore the entry-point button.
    pub fn close(&self) -> WidgetState {
        self.surface.remove_panel();
        let state = if self.surface.mount_button() {
            WidgetState::ButtonVisible
        } else {
            WidgetState::Hidden
        };
        *self.widget.write() = state;
        state
    }

    async fn resolve_credential(&self) -> Option<String> {
        {
            let credential = self.credential.read();
            match &*credential {
                CredentialCache::Present(key) => return Some(key.clone()),
                CredentialCache::Missing => return None,
                CredentialCache::Unresolved => {}
            }
        }

        let loaded = self.history.api_key().await;
        *self.credential.write() = match &loaded {
            Some(key) => CredentialCache::Present(key.clone()),
            None => CredentialCache::Missing,
        };
        loaded
    }
}
