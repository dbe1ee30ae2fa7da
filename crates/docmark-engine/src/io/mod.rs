//! Everything that talks to the outside world: the document editor, access
//! tokens and snapshot persistence.

pub mod credentials;
pub mod docs_api;
pub mod memory;
pub mod snapshot_store;

use crate::editing::{local::EditError, operations::EditOperation};
use crate::models::document::DocsDocument;

pub use credentials::{AuthError, CredentialSource, EnvToken, StaticToken};
pub use docs_api::{DEFAULT_BASE_URL, DocsClient, document_id_from_url};
pub use memory::MemoryEditor;
pub use snapshot_store::{
    FileSnapshotStore, MemorySnapshotStore, Snapshot, SnapshotStore, StoreError, storage_key,
};

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Failed to fetch document ({status}): {body}")]
    Fetch { status: u16, body: String },
    #[error("Failed to apply edits ({status}): {body}")]
    Apply { status: u16, body: String },
    #[error("Could not decode document: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Unknown document: {0}")]
    UnknownDocument(String),
    #[error("Invalid edit: {0}")]
    InvalidEdit(#[from] EditError),
}

/// Fetches documents and applies edit batches to them.
///
/// A batch is applied atomically and in order: either every operation lands
/// or the call fails.
#[allow(async_fn_in_trait)]
pub trait DocumentEditor {
    async fn fetch(&self, document_id: &str, token: &str) -> Result<DocsDocument, EditorError>;

    async fn apply(
        &self,
        document_id: &str,
        token: &str,
        requests: &[EditOperation],
    ) -> Result<(), EditorError>;
}
