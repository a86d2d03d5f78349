//! Problem context cache fed by the network tap.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex::Regex;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use algomentor_protocols::{ProblemContext, ProblemId, TrafficEvent};

/// "Problem by id" endpoint of the host application.
static PROBLEM_ENDPOINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/problems/user/(\d+)$").expect("problem endpoint pattern"));

const TAP_CAPACITY: usize = 64;

/// Transparent instrumentation seam over the host's outgoing requests.
///
/// Whoever intercepts the transport publishes completed responses here;
/// subscribers observe them without altering request semantics.
#[derive(Clone)]
pub struct NetworkTap {
    sender: broadcast::Sender<TrafficEvent>,
}

impl NetworkTap {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(TAP_CAPACITY);
        Self { sender }
    }

    /// Publish a completed request. Dropped silently when nobody listens.
    pub fn publish(&self, event: TrafficEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TrafficEvent> {
        self.sender.subscribe()
    }
}

impl Default for NetworkTap {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory map from problem id to scraped metadata.
///
/// Lives for the page-load session; entries are overwritten but never
/// evicted, so growth is unbounded by design.
pub struct ContextCache {
    entries: RwLock<HashMap<ProblemId, ProblemContext>>,
}

impl ContextCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Idempotent overwrite.
    pub fn put(&self, id: ProblemId, context: ProblemContext) {
        self.entries.write().insert(id, context);
    }

    /// Cached context, or `None` when no enrichment is available.
    pub fn get(&self, id: &ProblemId) -> Option<ProblemContext> {
        self.entries.read().get(id).cloned()
    }

    /// Filter and decode one observed response.
    ///
    /// Non-matching URLs are ignored. A body that fails to decode is
    /// logged and discarded; context enrichment degrades silently.
    pub fn ingest(&self, event: &TrafficEvent) -> Option<ProblemId> {
        let caps = PROBLEM_ENDPOINT.captures(&event.url)?;
        let id = ProblemId::new(&caps[1]);

        match serde_json::from_str::<ProblemContext>(&event.response) {
            Ok(context) => {
                debug!("Stored context for problem {}", id);
                self.put(id.clone(), context);
                Some(id)
            }
            Err(e) => {
                warn!("Discarding undecodable response for problem {}: {}", id, e);
                None
            }
        }
    }

    /// Drain a tap subscription into the cache for the life of the tap.
    pub fn attach(self: Arc<Self>, tap: &NetworkTap) -> tokio::task::JoinHandle<()> {
        let mut receiver = tap.subscribe();
        let cache = self;

        tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(event) => {
                        cache.ingest(&event);
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Network tap lagged, {} events dropped", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}

impl Default for ContextCache {
    fn default() -> Self {
        Self::new()
    }
}
