use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// In-flight marker per document id.
#[derive(Debug, Default)]
pub struct DocumentLocks {
    held: Mutex<HashSet<String>>,
}

impl DocumentLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `document_id` as busy, or returns `None` when it already is.
    ///
    /// The mark is removed when the returned guard is dropped.
    pub fn try_acquire(&self, document_id: &str) -> Option<DocumentGuard<'_>> {
        if !self.held().insert(document_id.to_string()) {
            return None;
        }
        Some(DocumentGuard {
            locks: self,
            document_id: document_id.to_string(),
        })
    }

    pub fn is_held(&self, document_id: &str) -> bool {
        self.held().contains(document_id)
    }

    fn held(&self) -> MutexGuard<'_, HashSet<String>> {
        self.held.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug)]
pub struct DocumentGuard<'a> {
    locks: &'a DocumentLocks,
    document_id: String,
}

impl DocumentGuard<'_> {
    pub fn document_id(&self) -> &str {
        &self.document_id
    }
}

impl Drop for DocumentGuard<'_> {
    fn drop(&mut self) {
        self.locks.held().remove(&self.document_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_fails_until_first_guard_drops() {
        let locks = DocumentLocks::new();

        let guard = locks.try_acquire("doc").unwrap();
        assert_eq!(guard.document_id(), "doc");
        assert!(locks.try_acquire("doc").is_none());
        assert!(locks.try_acquire("other").is_some());

        drop(guard);
        assert!(!locks.is_held("doc"));
        assert!(locks.try_acquire("doc").is_some());
    }
}
