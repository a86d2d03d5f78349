//! # Algomentor Store
//!
//! Durable key-value storage and the per-problem chat-history layer.

mod history;
mod kv;

pub use history::ChatHistoryStore;
pub use kv::{FileKeyValueStore, MemoryKeyValueStore};
