//! Document storage as JSON files.
//!
//! One directory per collection, one file per document. Document ids
//! are store-assigned uuids, never derived from record fields.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use royale_core::store::SERVER_TIMESTAMP;
use serde_json::Value;
use uuid::Uuid;

pub fn list_all(collection: &str) -> Result<Vec<String>> {
    list_all_in(&store_root()?, collection)
}

pub fn delete(collection: &str, doc_id: &str) -> Result<()> {
    delete_in(&store_root()?, collection, doc_id)
}

pub fn insert(collection: &str, record: Value) -> Result<String> {
    insert_in(&store_root()?, collection, record)
}

/// Root directory for all collections: $ROYALE_STORE_DIR if set,
/// otherwise <data dir>/royale/store.
fn store_root() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("ROYALE_STORE_DIR") {
        return Ok(PathBuf::from(dir));
    }

    let data_dir = dirs::data_dir().context("Could not determine data directory")?;
    Ok(data_dir.join("royale").join("store"))
}

fn list_all_in(root: &Path, collection: &str) -> Result<Vec<String>> {
    let dir = root.join(collection);

    let Ok(entries) = std::fs::read_dir(&dir) else {
        // A collection that was never written to is empty, not an error
        return Ok(Vec::new());
    };

    let mut ids: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("json"))
        .filter_map(|path| {
            path.file_stem()
                .and_then(|stem| stem.to_str())
                .map(|s| s.to_string())
        })
        .collect();

    ids.sort();
    Ok(ids)
}

fn delete_in(root: &Path, collection: &str, doc_id: &str) -> Result<()> {
    let path = document_path(root, collection, doc_id);
    std::fs::remove_file(&path)
        .with_context(|| format!("Failed to delete document '{}'", doc_id))
}

fn insert_in(root: &Path, collection: &str, mut record: Value) -> Result<String> {
    resolve_timestamp_markers(&mut record);

    let dir = root.join(collection);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create collection directory {}", dir.display()))?;

    let id = Uuid::new_v4().to_string();
    let path = document_path(root, collection, &id);
    let content = serde_json::to_string_pretty(&record)?;
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(id)
}

fn document_path(root: &Path, collection: &str, doc_id: &str) -> PathBuf {
    root.join(collection).join(format!("{}.json", doc_id))
}

/// Resolve server timestamp markers at write time, the store-side half
/// of the protocol's serverTimestamp contract.
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

    #[test]
    fn test_insert_list_delete_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        let id = insert_in(root, "classSchedules", json!({"summary": "CMPSC 221 - LEC"}))
            .unwrap();
        assert_eq!(list_all_in(root, "classSchedules").unwrap(), vec![id.clone()]);

        delete_in(root, "classSchedules", &id).unwrap();
        assert!(list_all_in(root, "classSchedules").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_collection_lists_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_all_in(dir.path(), "nothing").unwrap().is_empty());
    }

    #[test]
    fn test_delete_missing_document_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(delete_in(dir.path(), "classSchedules", "missing").is_err());
    }

    #[test]
    fn test_markers_resolve_to_timestamps() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        let id = insert_in(
            root,
            "classSchedules",
            json!({"summary": "x", "createdAt": SERVER_TIMESTAMP, "updatedAt": SERVER_TIMESTAMP}),
        )
        .unwrap();

        let content =
            std::fs::read_to_string(document_path(root, "classSchedules", &id)).unwrap();
        let doc: Value = serde_json::from_str(&content).unwrap();

        assert_ne!(doc["createdAt"].as_str(), Some(SERVER_TIMESTAMP));
        assert_eq!(doc["createdAt"], doc["updatedAt"]);
        assert!(
            doc["createdAt"]
                .as_str()
                .unwrap()
                .parse::<chrono::DateTime<Utc>>()
                .is_ok()
        );
    }
}
