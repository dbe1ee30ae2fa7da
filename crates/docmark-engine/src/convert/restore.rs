use crate::editing::operations::EditOperation;
use crate::io::{DocumentEditor, EditorError};
use crate::models::document::{DocsDocument, ORIGIN};
use crate::parsing::span::Span;

/// Deletion that empties `current`, leaving only its undeletable final newline.
pub fn clear_request(current: &DocsDocument) -> Option<EditOperation> {
    let last = current.end_index()?.checked_sub(1)?;
    (last > ORIGIN).then(|| EditOperation::DeleteRange {
        range: Span::new(ORIGIN, last),
    })
}

/// Insertion that writes the text of `saved` back at the start of the body.
///
/// The emptied document keeps its own final newline, so one trailing newline
/// is dropped from the saved text.
pub fn refill_request(saved: &DocsDocument) -> Option<EditOperation> {
    let text = saved.flatten_text();
    let text = text.strip_suffix('\n').unwrap_or(&text);
    (!text.is_empty()).then(|| EditOperation::InsertText {
        index: ORIGIN,
        text: text.to_string(),
    })
}

/// Replaces the body of the document with the text of `saved`.
///
/// Only text comes back; styling applied since the snapshot is not undone
/// beyond what deleting the content removes.
pub async fn restore_document<E: DocumentEditor>(
    editor: &E,
    document_id: &str,
    token: &str,
    saved: &DocsDocument,
) -> Result<(), EditorError> {
    let current = editor.fetch(document_id, token).await?;

    if let Some(clear) = clear_request(&current) {
        editor.apply(document_id, token, &[clear]).await?;
        log::debug!("Cleared current content of {document_id}");
    }

    if let Some(refill) = refill_request(saved) {
        editor.apply(document_id, token, &[refill]).await?;
    }

    Ok(())
}
