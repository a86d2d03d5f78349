//! Hand-rolled stub collaborators shared across the runtime tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use algomentor_protocols::{
    ChatMessage, CompletionError, CompletionPayload, CompletionProvider, WidgetSurface,
};

/// Everything a surface was asked to do, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    ButtonMounted,
    ButtonRemoved,
    PanelMounted,
    PanelRemoved,
    MessagesCleared,
    Message(ChatMessage),
    Notice(String),
    Pending(bool),
    InputEnabled(bool),
}

/// Recording widget surface.
pub struct StubSurface {
    events: Mutex<Vec<SurfaceEvent>>,
    container_present: AtomicBool,
    live: AtomicBool,
    confirm: AtomicBool,
}

impl StubSurface {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            container_present: AtomicBool::new(true),
            live: AtomicBool::new(true),
            confirm: AtomicBool::new(true),
        }
    }

    pub fn set_container_present(&self, present: bool) {
        self.container_present.store(present, Ordering::SeqCst);
    }

    pub fn set_live(&self, live: bool) {
        self.live.store(live, Ordering::SeqCst);
    }

    pub fn set_confirm(&self, confirm: bool) {
        self.confirm.store(confirm, Ordering::SeqCst);
    }

    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.events.lock().clone()
    }

    pub fn rendered_messages(&self) -> Vec<ChatMessage> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SurfaceEvent::Message(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn notices(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SurfaceEvent::Notice(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: SurfaceEvent) {
        self.events.lock().push(event);
    }
}

impl WidgetSurface for StubSurface {
    fn mount_button(&self) -> bool {
        if !self.container_present.load(Ordering::SeqCst) {
            return false;
        }
        self.record(SurfaceEvent::ButtonMounted);
        true
    }

    fn remove_button(&self) {
        self.record(SurfaceEvent::ButtonRemoved);
    }

    fn mount_panel(&self) -> bool {
        if !self.container_present.load(Ordering::SeqCst) {
            return false;
        }
        self.record(SurfaceEvent::PanelMounted);
        true
    }

    fn remove_panel(&self) {
        self.record(SurfaceEvent::PanelRemoved);
    }

    fn clear_messages(&self) {
        self.record(SurfaceEvent::MessagesCleared);
    }

    fn render_message(&self, message: &ChatMessage) {
        self.record(SurfaceEvent::Message(message.clone()));
    }

    fn render_notice(&self, text: &str) {
        self.record(SurfaceEvent::Notice(text.to_string()));
    }

    fn set_pending(&self, pending: bool) {
        self.record(SurfaceEvent::Pending(pending));
    }

    fn set_input_enabled(&self, enabled: bool) {
        self.record(SurfaceEvent::InputEnabled(enabled));
    }

    fn confirm_clear(&self) -> bool {
        self.confirm.load(Ordering::SeqCst)
    }

    fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }
}

/// Scripted completion provider; records every payload it sees.
pub struct StubProvider {
    replies: Mutex<VecDeque<Result<String, CompletionError>>>,
    requests: Mutex<Vec<(CompletionPayload, String)>>,
}

impl StubProvider {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_reply(text: impl Into<String>) -> Self {
        let provider = Self::new();
        provider.push_reply(text);
        provider
    }

    pub fn push_reply(&self, text: impl Into<String>) {
        self.replies.lock().push_back(Ok(text.into()));
    }

    pub fn push_error(&self, error: CompletionError) {
        self.replies.lock().push_back(Err(error));
    }

    /// Payloads and credentials seen, in call order.
    pub fn requests(&self) -> Vec<(CompletionPayload, String)> {
        self.requests.lock().clone()
    }

    pub fn payload_texts(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|(payload, _)| payload.text())
            .collect()
    }
}

#[async_trait]
impl CompletionProvider for StubProvider {
    async fn complete(
        &self,
        payload: &CompletionPayload,
        api_key: &str,
    ) -> Result<String, CompletionError> {
        self.requests
            .lock()
            .push((payload.clone(), api_key.to_string()));
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok("stub reply".to_string()))
    }
}

/// Provider that parks in `complete` until released, for pending-state
/// tests.
pub struct BlockingProvider {
    pub entered: Arc<Semaphore>,
    pub release: Arc<Semaphore>,
}

impl BlockingProvider {
    pub fn new() -> Self {
        Self {
            entered: Arc::new(Semaphore::new(0)),
            release: Arc::new(Semaphore::new(0)),
        }
    }
}

#[async_trait]
impl CompletionProvider for BlockingProvider {
    async fn complete(
        &self,
        _payload: &CompletionPayload,
        _api_key: &str,
    ) -> Result<String, CompletionError> {
        self.entered.add_permits(1);
        let permit = self.release.acquire().await.expect("release semaphore");
        permit.forget();
        Ok("late reply".to_string())
    }
}
