//! The document store seam.
//!
//! The pipeline depends on four primitives: enumerate, delete, insert,
//! and a server-resolved timestamp marker. Backends are injected where
//! the synchronizer is constructed, so tests run against [`MemoryStore`]
//! and deployments pick a subprocess backend via [`ProviderStore`].

pub mod memory;
pub mod protocol;
pub mod provider;

pub use memory::MemoryStore;
pub use provider::{ProviderStore, StoreProvider};

use crate::error::RoyaleResult;

/// Sentinel value a backend replaces with its own write-time timestamp.
pub const SERVER_TIMESTAMP: &str = "__serverTimestamp__";

/// Minimal contract consumed from the remote document store.
///
/// Documents are JSON objects; document ids are store-assigned and are
/// never derived from record fields.
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    /// Enumerate the ids of every document in `collection`.
    async fn list_all(&self, collection: &str) -> RoyaleResult<Vec<String>>;

    /// Delete one document by id.
    async fn delete(&self, collection: &str, doc_id: &str) -> RoyaleResult<()>;

    /// Insert a new document, returning its store-assigned id.
    async fn insert(&self, collection: &str, record: serde_json::Value) -> RoyaleResult<String>;

    /// Opaque marker resolved server-side at write time.
    fn server_timestamp(&self) -> serde_json::Value {
        serde_json::Value::String(SERVER_TIMESTAMP.to_string())
    }
}
