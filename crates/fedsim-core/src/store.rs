//! Resource store contract and in-memory implementation.
//!
//! The store's native interface is asynchronous: the server under test
//! accesses it from its own execution context while the harness seeds
//! fixtures through a synchronous bridge. The harness only ever needs
//! `put` and `get`; update, delete, and listing are the server's business.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use thiserror::Error;

use crate::resource::Resource;

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No resource with the requested id.
    #[error("resource not found: {id}")]
    NotFound {
        /// The id that was requested.
        id: String,
    },

    /// A resource without an `id` cannot be stored.
    #[error("resource has no id")]
    MissingId,

    /// Backend failure (I/O, poisoned lock, connection loss).
    #[error("store backend error: {reason}")]
    Backend {
        /// Description of the backend failure.
        reason: String,
    },
}

/// Persistence capability for protocol resources.
///
/// Implementations must tolerate concurrent access: the harness sequences
/// its own calls single-threaded, but the server under test may read and
/// write from a separate execution context at the same time.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Store a resource, addressed by its `id`. Overwrites any previous
    /// resource with the same id.
    async fn put(&self, resource: Resource) -> Result<(), StoreError>;

    /// Retrieve a resource by id.
    async fn get(&self, id: &str) -> Result<Resource, StoreError>;
}

/// In-memory store keyed by resource id.
///
/// The lock is held only for the duration of the map operation, never
/// across an await point.
#[derive(Debug, Default)]
pub struct MemoryStore {
    resources: RwLock<HashMap<String, Resource>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored resources.
    pub fn len(&self) -> usize {
        self.resources.read().map_or(0, |map| map.len())
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a resource with this id is present.
    pub fn contains(&self, id: &str) -> bool {
        self.resources.read().is_ok_and(|map| map.contains_key(id))
    }

    /// Snapshot of all stored ids, for test assertions.
    pub fn ids(&self) -> Vec<String> {
        self.resources.read().map_or_else(|_| Vec::new(), |map| map.keys().cloned().collect())
    }

    /// Snapshot of all resources whose `type` matches, for test assertions.
    pub fn of_kind(&self, kind: &str) -> Vec<Resource> {
        self.resources.read().map_or_else(
            |_| Vec::new(),
            |map| map.values().filter(|r| r.kind() == Some(kind)).cloned().collect(),
        )
    }
}

#[async_trait]
impl ResourceStore for MemoryStore {
    async fn put(&self, resource: Resource) -> Result<(), StoreError> {
        let id = resource.id().ok_or(StoreError::MissingId)?.to_string();

        let mut map = self
            .resources
            .write()
            .map_err(|e| StoreError::Backend { reason: e.to_string() })?;

        tracing::debug!(%id, "storing resource");
        map.insert(id, resource);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Resource, StoreError> {
        let map = self
            .resources
            .read()
            .map_err(|e| StoreError::Backend { reason: e.to_string() })?;

        map.get(id).cloned().ok_or_else(|| StoreError::NotFound { id: id.to_string() })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn note(id: &str) -> Resource {
        Resource::from_value(json!({ "id": id, "type": "Note" })).unwrap()
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let store = MemoryStore::new();
        let resource = note("https://server.test/notes/1");

        store.put(resource.clone()).await.unwrap();

        let loaded = store.get("https://server.test/notes/1").await.unwrap();
        assert_eq!(loaded, resource);
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let store = MemoryStore::new();

        let result = store.get("https://server.test/nothing").await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn put_without_id_is_rejected() {
        let store = MemoryStore::new();
        let resource = Resource::from_value(json!({ "type": "Note" })).unwrap();

        let result = store.put(resource).await;
        assert!(matches!(result, Err(StoreError::MissingId)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn put_overwrites_same_id() {
        let store = MemoryStore::new();
        let id = "https://server.test/notes/1";

        store.put(note(id)).await.unwrap();

        let mut updated = note(id);
        updated.set("content", "edited");
        store.put(updated.clone()).await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn of_kind_filters_by_type() {
        let store = MemoryStore::new();
        store.put(note("https://server.test/notes/1")).await.unwrap();
        store
            .put(Resource::credential("https://server.test/actor", "PEM"))
            .await
            .unwrap();

        let credentials = store.of_kind(crate::vocab::CREDENTIALS_TYPE);
        assert_eq!(credentials.len(), 1);
        assert_eq!(credentials[0].attributed_to(), Some("https://server.test/actor"));
    }
}
