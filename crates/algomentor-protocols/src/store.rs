//! Durable key-value storage seam.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreError;

/// Durable key-value store, the persistence collaborator of the runtime.
///
/// Implementations must be read-your-writes consistent for a single
/// writer: a completed `set` is observable by the next `get` for the
/// same key.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch a value. Absent keys yield `Ok(None)`.
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Store a value, overwriting any previous one.
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Remove a key. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}
