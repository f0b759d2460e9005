//! In-process document store.
//!
//! Backs tests and dry runs. Clones share the same underlying map so a
//! handle can be kept for inspection after the pipeline consumed one.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::error::{RoyaleError, RoyaleResult};
use crate::store::{DocumentStore, SERVER_TIMESTAMP};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<Mutex<HashMap<String, BTreeMap<String, Value>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a collection's documents, in id order.
    pub fn documents(&self, collection: &str) -> Vec<Value> {
        let collections = self.lock();
        collections
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self, collection: &str) -> usize {
        self.lock().get(collection).map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, BTreeMap<String, Value>>> {
        // Lock poisoning only happens if a holder panicked; the map is
        // still usable for the remaining assertions.
        self.collections
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DocumentStore for MemoryStore {
    async fn list_all(&self, collection: &str) -> RoyaleResult<Vec<String>> {
        Ok(self
            .lock()
            .get(collection)
            .map(|docs| docs.keys().cloned().collect())
            .unwrap_or_default())
    }

    async fn delete(&self, collection: &str, doc_id: &str) -> RoyaleResult<()> {
        match self.lock().get_mut(collection).and_then(|docs| docs.remove(doc_id)) {
            Some(_) => Ok(()),
            None => Err(RoyaleError::Store(format!(
                "no document '{}' in collection '{}'",
                doc_id, collection
            ))),
        }
    }

    async fn insert(&self, collection: &str, mut record: Value) -> RoyaleResult<String> {
        resolve_timestamp_markers(&mut record);

        let id = Uuid::new_v4().to_string();
        self.lock()
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), record);
        Ok(id)
    }
}

/// Replace top-level timestamp markers with the current instant, the
/// way a real backend resolves them at write time.
fn resolve_timestamp_markers(record: &mut Value) {
    let Some(fields) = record.as_object_mut() else {
        return;
    };
    let now = Value::String(Utc::now().to_rfc3339());
    for value in fields.values_mut() {
        if value.as_str() == Some(SERVER_TIMESTAMP) {
            *value = now.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_insert_list_delete_roundtrip() {
        let store = MemoryStore::new();

        let id = store
            .insert("classSchedules", json!({"summary": "CMPSC 221 - LEC"}))
            .await
            .unwrap();
        assert_eq!(store.list_all("classSchedules").await.unwrap(), vec![id.clone()]);

        store.delete("classSchedules", &id).await.unwrap();
        assert!(store.is_empty("classSchedules"));
    }

    #[tokio::test]
    async fn test_delete_unknown_document_errors() {
        let store = MemoryStore::new();
        let err = store.delete("classSchedules", "nope").await.unwrap_err();
        assert!(matches!(err, RoyaleError::Store(_)));
    }

    #[tokio::test]
    async fn test_timestamp_markers_resolve_on_insert() {
        let store = MemoryStore::new();
        store
            .insert(
                "classSchedules",
                json!({"summary": "x", "createdAt": store.server_timestamp()}),
            )
            .await
            .unwrap();

        let doc = &store.documents("classSchedules")[0];
        let created_at = doc["createdAt"].as_str().unwrap();
        assert_ne!(created_at, SERVER_TIMESTAMP);
        assert!(created_at.parse::<chrono::DateTime<Utc>>().is_ok());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryStore::new();
        let handle = store.clone();
        store.insert("c", json!({})).await.unwrap();
        assert_eq!(handle.len("c"), 1);
    }
}
