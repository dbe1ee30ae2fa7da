use crate::io::{AuthError, EditorError, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Could not find a document id in {0}")]
    MissingDocumentId(String),
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("No snapshot found for this document")]
    SnapshotNotFound,
    #[error("Snapshot is corrupt: {0}")]
    CorruptSnapshot(#[source] serde_json::Error),
    #[error("A conversion is already running for document {0}")]
    Busy(String),
}
