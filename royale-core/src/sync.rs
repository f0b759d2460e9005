//! Full-replace synchronization into the document store.
//!
//! The replace is not atomic across stages: a failure between delete
//! and insert can leave the collection empty or partially populated.
//! Rerunning the whole pipeline against the store reproduces the same
//! end state, so recovery is a caller-driven re-run.

use futures::future;
use serde_json::Value;

use crate::error::{RoyaleError, RoyaleResult};
use crate::schedule::ScheduleEntry;
use crate::store::DocumentStore;

pub const DEFAULT_BATCH_SIZE: usize = 20;

/// Outcome of a successful replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncReport {
    pub deleted: usize,
    pub inserted: usize,
    /// Number of insert waves, `ceil(inserted / batch_size)`.
    pub waves: usize,
}

/// Replaces a collection's contents with a freshly computed schedule.
///
/// The store handle is injected at construction so tests can run
/// against in-memory doubles.
pub struct Synchronizer<S> {
    store: S,
    collection: String,
    batch_size: usize,
}

impl<S: DocumentStore> Synchronizer<S> {
    pub fn new(store: S, collection: impl Into<String>, batch_size: usize) -> Self {
        Synchronizer {
            store,
            collection: collection.into(),
            batch_size: batch_size.max(1),
        }
    }

    /// Replace the collection's contents with exactly `entries`.
    ///
    /// Existing documents are deleted concurrently, then the new
    /// entries are inserted in fixed-size waves: concurrent within a
    /// wave, waves strictly sequential to respect store rate limits.
    pub async fn replace_all(&self, entries: &[ScheduleEntry]) -> RoyaleResult<SyncReport> {
        let deleted = self.clear().await?;
        log::debug!(
            "cleared {} existing documents from '{}'",
            deleted,
            self.collection
        );

        let mut inserted = 0;
        let mut waves = 0;

        for chunk in entries.chunks(self.batch_size) {
            let documents = chunk
                .iter()
                .map(|entry| self.to_document(entry))
                .collect::<RoyaleResult<Vec<_>>>()?;

            let results = future::join_all(
                documents
                    .into_iter()
                    .map(|doc| self.store.insert(&self.collection, doc)),
            )
            .await;

            waves += 1;
            let (completed, first_error) = tally(&results);
            inserted += completed;

            if let Some(reason) = first_error {
                return Err(RoyaleError::SyncFailed {
                    completed: inserted,
                    reason,
                });
            }
        }

        log::debug!(
            "inserted {} documents into '{}' in {} waves",
            inserted,
            self.collection,
            waves
        );

        Ok(SyncReport {
            deleted,
            inserted,
            waves,
        })
    }

    /// Delete every existing document. Returns the number deleted.
    ///
    /// Deletions run with unbounded concurrency; collections are
    /// demo-scale by assumption.
    async fn clear(&self) -> RoyaleResult<usize> {
        let ids = self.store.list_all(&self.collection).await?;

        let results = future::join_all(
            ids.iter()
                .map(|id| self.store.delete(&self.collection, id)),
        )
        .await;

        let (completed, first_error) = tally(&results);
        match first_error {
            Some(reason) => Err(RoyaleError::SyncFailed { completed, reason }),
            None => Ok(completed),
        }
    }

    /// Serialize an entry and attach the server-resolved timestamps.
    fn to_document(&self, entry: &ScheduleEntry) -> RoyaleResult<Value> {
        let mut doc = serde_json::to_value(entry)
            .map_err(|e| RoyaleError::Serialization(e.to_string()))?;

        if let Some(fields) = doc.as_object_mut() {
            fields.insert("createdAt".to_string(), self.store.server_timestamp());
            fields.insert("updatedAt".to_string(), self.store.server_timestamp());
        }

        Ok(doc)
    }
}

fn tally<T>(results: &[RoyaleResult<T>]) -> (usize, Option<String>) {
    let completed = results.iter().filter(|r| r.is_ok()).count();
    let first_error = results
        .iter()
        .find_map(|r| r.as_ref().err().map(|e| e.to_string()));
    (completed, first_error)
}
