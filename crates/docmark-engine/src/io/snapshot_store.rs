//! Pre-conversion copies of documents, one per document id.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::models::document::DocsDocument;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Snapshot storage failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Snapshot could not be encoded: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key a snapshot is stored under.
pub fn storage_key(document_id: &str) -> String {
    format!("backup_{document_id}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub document_id: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// The fetched document, serialized as JSON.
    pub content: String,
}

impl Snapshot {
    pub fn capture(document_id: &str, doc: &DocsDocument) -> Result<Self, serde_json::Error> {
        Ok(Self {
            document_id: document_id.to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            content: serde_json::to_string(doc)?,
        })
    }

    pub fn document(&self) -> Result<DocsDocument, serde_json::Error> {
        serde_json::from_str(&self.content)
    }
}

/// Keyed persistence for [`Snapshot`]s.
///
/// `save` overwrites any snapshot already held for the same document and
/// `clear` succeeds when there is nothing to remove.
#[allow(async_fn_in_trait)]
pub trait SnapshotStore {
    async fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError>;
    async fn get(&self, document_id: &str) -> Result<Option<Snapshot>, StoreError>;
    async fn clear(&self, document_id: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    entries: Mutex<HashMap<String, Snapshot>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    async fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(storage_key(&snapshot.document_id), snapshot.clone());
        Ok(())
    }

    async fn get(&self, document_id: &str) -> Result<Option<Snapshot>, StoreError> {
        Ok(self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&storage_key(document_id))
            .cloned())
    }

    async fn clear(&self, document_id: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&storage_key(document_id));
        Ok(())
    }
}

/// One JSON file per snapshot, `<dir>/backup_<id>.json`.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, document_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", storage_key(document_id)))
    }
}

impl SnapshotStore for FileSnapshotStore {
    async fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let json = serde_json::to_string_pretty(snapshot)?;
        tokio::fs::write(self.path_for(&snapshot.document_id), json).await?;
        log::debug!("Saved snapshot for {}", snapshot.document_id);
        Ok(())
    }

    async fn get(&self, document_id: &str) -> Result<Option<Snapshot>, StoreError> {
        match tokio::fs::read_to_string(self.path_for(document_id)).await {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn clear(&self, document_id: &str) -> Result<(), StoreError> {
        match tokio::fs::remove_file(self.path_for(document_id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::local::LocalDocument;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn snapshot(id: &str, text: &str) -> Snapshot {
        Snapshot::capture(id, &LocalDocument::from_text(text).to_docs_document(id)).unwrap()
    }

    #[test]
    fn key_is_prefixed() {
        assert_eq!(storage_key("abc"), "backup_abc");
    }

    #[test]
    fn capture_round_trips_document() {
        let doc = LocalDocument::from_text("# Title").to_docs_document("abc");
        let snapshot = Snapshot::capture("abc", &doc).unwrap();

        assert_eq!(snapshot.document().unwrap(), doc);
        assert!(snapshot.timestamp > 0);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let snapshot = Snapshot {
            document_id: "abc".to_string(),
            timestamp: 1_700_000_000_000,
            content: "{}".to_string(),
        };
        insta::assert_json_snapshot!(snapshot, @r###"
        {
          "documentId": "abc",
          "timestamp": 1700000000000,
          "content": "{}"
        }
        "###);
    }

    #[tokio::test]
    async fn memory_store_save_get_clear() {
        let store = MemorySnapshotStore::new();
        let saved = snapshot("abc", "text");

        store.save(&saved).await.unwrap();
        assert_eq!(store.get("abc").await.unwrap(), Some(saved));

        store.clear("abc").await.unwrap();
        assert_eq!(store.get("abc").await.unwrap(), None);
        store.clear("abc").await.unwrap();
    }

    #[tokio::test]
    async fn file_store_save_get_clear() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSnapshotStore::new(temp_dir.path().join("snapshots"));
        let saved = snapshot("abc", "text");

        assert_eq!(store.get("abc").await.unwrap(), None);

        store.save(&saved).await.unwrap();
        assert!(temp_dir.path().join("snapshots/backup_abc.json").exists());
        assert_eq!(store.get("abc").await.unwrap(), Some(saved));

        store.clear("abc").await.unwrap();
        assert_eq!(store.get("abc").await.unwrap(), None);
        store.clear("abc").await.unwrap();
    }

    #[tokio::test]
    async fn save_overwrites_previous_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSnapshotStore::new(temp_dir.path());

        store.save(&snapshot("abc", "first")).await.unwrap();
        let second = snapshot("abc", "second");
        store.save(&second).await.unwrap();

        assert_eq!(store.get("abc").await.unwrap(), Some(second));
    }
}
