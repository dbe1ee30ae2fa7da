//! The conversion workflow.
//!
//! A conversion runs as a fixed sequence of stages:
//!
//! 1. **Fetch** the document and save a snapshot of it.
//! 2. **ScanBlocks**: detect heading and list lines in the flattened text, and
//!    count bold spans.
//! 3. **ApplyBlocks**: send style and marker-deletion requests for the lines.
//! 4. **RescanBold**: fetch again, since the deletions moved everything after
//!    them, and find bold spans at their new offsets.
//! 5. **ApplyBold**: send bold styling and marker-deletion requests.
//!
//! Any failure ends the run. Nothing is retried and nothing already applied
//! is rolled back; the snapshot is what undo restores from.

pub mod error;
pub mod locks;
pub mod plan;
pub mod restore;

use std::fmt;

pub use error::ConvertError;
pub use locks::{DocumentGuard, DocumentLocks};
pub use plan::{ConversionPlan, plan_conversion};
pub use restore::restore_document;

use crate::editing::builder::EditBuilder;
use crate::io::{
    CredentialSource, DocumentEditor, SnapshotStore, document_id_from_url, snapshot_store::Snapshot,
};
use crate::models::result::{ConversionCounts, ConversionResult, Request};
use crate::parsing::scanner::MarkerScanner;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Fetch,
    ScanBlocks,
    ApplyBlocks,
    RescanBold,
    ApplyBold,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Fetch => "fetch",
            Stage::ScanBlocks => "scan-blocks",
            Stage::ApplyBlocks => "apply-blocks",
            Stage::RescanBold => "rescan-bold",
            Stage::ApplyBold => "apply-bold",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Outcome of a conversion that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Converted(ConversionCounts),
    NoMarkers,
}

impl From<Outcome> for ConversionResult {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Converted(counts) => ConversionResult::converted(counts),
            Outcome::NoMarkers => ConversionResult::no_markers(),
        }
    }
}

pub struct Converter<E, S, C> {
    editor: E,
    store: S,
    credentials: C,
    scanner: MarkerScanner,
    builder: EditBuilder,
    locks: DocumentLocks,
}

impl<E, S, C> Converter<E, S, C>
where
    E: DocumentEditor,
    S: SnapshotStore,
    C: CredentialSource,
{
    pub fn new(editor: E, store: S, credentials: C) -> Self {
        Self {
            editor,
            store,
            credentials,
            scanner: MarkerScanner::default(),
            builder: EditBuilder::default(),
            locks: DocumentLocks::new(),
        }
    }

    pub fn with_builder(mut self, builder: EditBuilder) -> Self {
        self.builder = builder;
        self
    }

    pub fn editor(&self) -> &E {
        &self.editor
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn locks(&self) -> &DocumentLocks {
        &self.locks
    }

    /// Dispatches one inbound message for the document open at `url`.
    pub async fn handle(&self, request: Request, url: &str) -> ConversionResult {
        match request {
            Request::ConvertMarkdown => self.convert(url).await,
            Request::UndoConversion => self.undo(url).await,
        }
    }

    /// Converts the document at `url`. Errors are folded into the result.
    pub async fn convert(&self, url: &str) -> ConversionResult {
        match self.try_convert(url).await {
            Ok(outcome) => outcome.into(),
            Err(e) => {
                log::error!("Conversion failed: {e}");
                ConversionResult::failure(e)
            }
        }
    }

    /// Restores the document at `url` from its snapshot. Errors are folded into the result.
    pub async fn undo(&self, url: &str) -> ConversionResult {
        match self.try_undo(url).await {
            Ok(()) => ConversionResult::restored(),
            Err(e) => {
                log::error!("Undo failed: {e}");
                ConversionResult::failure(e)
            }
        }
    }

    pub async fn try_convert(&self, url: &str) -> Result<Outcome, ConvertError> {
        let document_id = document_id(url)?;
        let _guard = self.acquire(document_id)?;
        let token = self.credentials.token()?;

        let mut stage = Stage::Idle;
        let result = self.run_stages(document_id, &token, &mut stage).await;
        match &result {
            Ok(_) => advance(&mut stage, Stage::Done),
            Err(e) => {
                log::debug!("Stage {stage} failed: {e}");
                advance(&mut stage, Stage::Failed);
            }
        }
        result
    }

    pub async fn try_undo(&self, url: &str) -> Result<(), ConvertError> {
        let document_id = document_id(url)?;
        let _guard = self.acquire(document_id)?;
        let token = self.credentials.token()?;

        let snapshot = self
            .store
            .get(document_id)
            .await?
            .ok_or(ConvertError::SnapshotNotFound)?;
        let saved = snapshot.document().map_err(ConvertError::CorruptSnapshot)?;

        restore_document(&self.editor, document_id, &token, &saved).await?;
        self.store.clear(document_id).await?;

        log::info!("Restored {document_id} from snapshot taken at {}", snapshot.timestamp);
        Ok(())
    }

    async fn run_stages(
        &self,
        document_id: &str,
        token: &str,
        stage: &mut Stage,
    ) -> Result<Outcome, ConvertError> {
        advance(stage, Stage::Fetch);
        let doc = self.editor.fetch(document_id, token).await?;
        let snapshot = Snapshot::capture(document_id, &doc)
            .map_err(|e| ConvertError::Store(e.into()))?;
        self.store.save(&snapshot).await?;

        advance(stage, Stage::ScanBlocks);
        let lines: Vec<_> = self.scanner.scan_lines(&doc.flatten_text()).collect();
        let bold_found = self.scanner.scan_bold(&doc).len();
        let counts = ConversionCounts::tally(&lines, bold_found);
        if counts.is_empty() {
            log::info!("No Markdown markers in {document_id}");
            return Ok(Outcome::NoMarkers);
        }

        advance(stage, Stage::ApplyBlocks);
        let block_requests = self.builder.block_requests(&doc, &lines);
        if !block_requests.is_empty() {
            self.editor.apply(document_id, token, &block_requests).await?;
        }

        advance(stage, Stage::RescanBold);
        let doc = self.editor.fetch(document_id, token).await?;
        let bold = self.scanner.scan_bold(&doc);

        advance(stage, Stage::ApplyBold);
        let bold_requests = self.builder.bold_requests(&bold);
        if !bold_requests.is_empty() {
            self.editor.apply(document_id, token, &bold_requests).await?;
        }

        log::info!(
            "Converted {document_id}: {} headings, {} lists, {} bold",
            counts.headings,
            counts.lists,
            counts.bold
        );
        Ok(Outcome::Converted(counts))
    }

    fn acquire(&self, document_id: &str) -> Result<DocumentGuard<'_>, ConvertError> {
        self.locks
            .try_acquire(document_id)
            .ok_or_else(|| ConvertError::Busy(document_id.to_string()))
    }
}

fn document_id(url: &str) -> Result<&str, ConvertError> {
    document_id_from_url(url).ok_or_else(|| ConvertError::MissingDocumentId(url.to_string()))
}

fn advance(stage: &mut Stage, next: Stage) {
    log::debug!("Stage {stage} -> {next}");
    *stage = next;
}
