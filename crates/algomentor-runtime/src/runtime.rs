//! Composition root for the helper runtime.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

use algomentor_protocols::{
    CompletionProvider, KeyValueStore, SettingsNotice, WidgetState, WidgetSurface,
};
use algomentor_store::ChatHistoryStore;

use crate::context::{ContextCache, NetworkTap};
use crate::session::{ChatSession, SendOutcome};
use crate::watcher::PageWatcher;

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;

/// One helper instance per page load.
///
/// Owns the watcher, the context cache, and the chat session; all
/// process-wide state lives here with the instance's lifecycle (created
/// at module initialization, reset only by a full reload) instead of in
/// ambient singletons. Collaborators - storage, provider, surface -
/// are injected.
pub struct HelperRuntime {
    watcher: Mutex<PageWatcher>,
    session: Arc<ChatSession>,
    context: Arc<ContextCache>,
    history: Arc<ChatHistoryStore>,
    surface: Arc<dyn WidgetSurface>,
}

impl HelperRuntime {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        provider: Arc<dyn CompletionProvider>,
        surface: Arc<dyn WidgetSurface>,
    ) -> Self {
        let history = Arc::new(ChatHistoryStore::new(store));
        let context = Arc::new(ContextCache::new());
        let session = Arc::new(ChatSession::new(
            Arc::clone(&history),
            Arc::clone(&context),
            provider,
            Arc::clone(&surface),
        ));

        Self {
            watcher: Mutex::new(PageWatcher::new()),
            session,
            context,
            history,
            surface,
        }
    }

    /// Feed one mutation notification through the watcher.
    pub fn on_mutation(&self, current_path: &str) {
        let state = self
            .watcher
            .lock()
            .handle_mutation(current_path, self.surface.as_ref());
        if let Some(state) = state {
            self.session.set_route(current_path, state);
        }
    }

    /// Apply a credential notification from the settings surface.
    pub fn on_settings(&self, notice: SettingsNotice) {
        self.session.apply_settings_notice(notice);
    }

    /// Start draining a network tap into the context cache.
    pub fn attach_tap(&self, tap: &NetworkTap) -> JoinHandle<()> {
        Arc::clone(&self.context).attach(tap)
    }

    pub async fn open_widget(&self) -> WidgetState {
        self.session.open().await
    }

    pub async fn send(&self, text: &str) -> SendOutcome {
        self.session.send(text).await
    }

    pub async fn clear_history(&self) -> bool {
        self.session.clear().await
    }

    pub fn close_widget(&self) -> WidgetState {
        self.session.close()
    }

    pub fn widget_state(&self) -> WidgetState {
        self.session.widget_state()
    }

    pub fn context(&self) -> &Arc<ContextCache> {
        &self.context
    }

    pub fn history(&self) -> &Arc<ChatHistoryStore> {
        &self.history
    }

    pub fn session(&self) -> &Arc<ChatSession> {
        &self.session
    }
}
