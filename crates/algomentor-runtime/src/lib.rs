//! # Algomentor Runtime
//!
//! Page-lifecycle detection and the chat-session state machine: decides
//! when the helper widget mounts and unmounts, and how a conversation's
//! persisted state evolves across navigations and completion calls.

mod config;
mod context;
mod prompt;
mod runtime;
mod session;
mod watcher;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::RuntimeConfig;
pub use context::{ContextCache, NetworkTap};
pub use prompt::augment_with_context;
pub use runtime::HelperRuntime;
pub use session::{ChatSession, SendOutcome};
pub use watcher::{PageWatcher, RouteChange};
