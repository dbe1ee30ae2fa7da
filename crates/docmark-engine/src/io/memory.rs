use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::editing::{local::LocalDocument, operations::EditOperation};
use crate::io::{DocumentEditor, EditorError};
use crate::models::document::DocsDocument;

/// A [`DocumentEditor`] backed by [`LocalDocument`]s held in memory.
///
/// Tokens are accepted and ignored. Every applied batch is recorded.
#[derive(Debug, Default)]
pub struct MemoryEditor {
    documents: Mutex<HashMap<String, LocalDocument>>,
    batches: Mutex<Vec<Vec<EditOperation>>>,
}

impl MemoryEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(document_id: &str, text: &str) -> Self {
        let editor = Self::new();
        editor.insert(document_id, LocalDocument::from_text(text));
        editor
    }

    pub fn insert(&self, document_id: &str, document: LocalDocument) {
        lock(&self.documents).insert(document_id.to_string(), document);
    }

    pub fn document(&self, document_id: &str) -> Option<LocalDocument> {
        lock(&self.documents).get(document_id).cloned()
    }

    pub fn text(&self, document_id: &str) -> Option<String> {
        lock(&self.documents).get(document_id).map(LocalDocument::text)
    }

    /// Batches applied so far, oldest first.
    pub fn batches(&self) -> Vec<Vec<EditOperation>> {
        lock(&self.batches).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl DocumentEditor for MemoryEditor {
    async fn fetch(&self, document_id: &str, _token: &str) -> Result<DocsDocument, EditorError> {
        lock(&self.documents)
            .get(document_id)
            .map(|document| document.to_docs_document(document_id))
            .ok_or_else(|| EditorError::UnknownDocument(document_id.to_string()))
    }

    async fn apply(
        &self,
        document_id: &str,
        _token: &str,
        requests: &[EditOperation],
    ) -> Result<(), EditorError> {
        let mut documents = lock(&self.documents);
        let current = documents
            .get(document_id)
            .ok_or_else(|| EditorError::UnknownDocument(document_id.to_string()))?;

        let mut updated = current.clone();
        updated.apply_all(requests)?;
        documents.insert(document_id.to_string(), updated);
        drop(documents);

        lock(&self.batches).push(requests.to_vec());
        Ok(())
    }
}
