use std::ops::RangeInclusive;

use crate::models::{
    detection::LineDetection,
    document::{DocsDocument, ORIGIN},
};
use crate::parsing::{
    span::Span,
    units::{utf16_len, utf16_offset},
};

/// Where a line detection landed in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedLine {
    pub span: Span,
    /// False when only the trimmed text was found, in which case the span
    /// already starts at the marker.
    pub exact: bool,
}

/// First range at which `needle` occurs inside a single text run.
///
/// Runs are walked in document order with a cursor starting at [`ORIGIN`].
/// Returns `None` when the text is absent; that is an expected outcome.
pub fn find_text_position(doc: &DocsDocument, needle: &str) -> Option<Span> {
    find_text_within(doc, needle, ORIGIN..=usize::MAX)
}

/// Like [`find_text_position`], only accepting a match that starts inside `starts`.
pub fn find_text_within(
    doc: &DocsDocument,
    needle: &str,
    starts: RangeInclusive<usize>,
) -> Option<Span> {
    if needle.is_empty() {
        return None;
    }

    let needle_len = utf16_len(needle);
    let mut cursor = ORIGIN;

    for content in doc.runs().filter_map(|element| element.text()) {
        if cursor > *starts.end() {
            break;
        }
        for (byte, _) in content.match_indices(needle) {
            let start = cursor + utf16_offset(content, byte);
            if start > *starts.end() {
                return None;
            }
            if starts.contains(&start) {
                return Some(Span::at(start, needle_len));
            }
        }
        cursor += utf16_len(content);
    }

    None
}

/// Resolves a line detection against the document it was scanned from.
///
/// Matches are pinned to the line's own offset: the exact line must start
/// there, and the trimmed form must start within the line's indentation.
/// A line split across runs therefore resolves to `None` rather than to a
/// later line with the same text.
pub fn resolve_line(doc: &DocsDocument, detection: &LineDetection) -> Option<ResolvedLine> {
    let line_start = ORIGIN + detection.offset;

    if let Some(span) = find_text_within(doc, &detection.source_text, line_start..=line_start) {
        return Some(ResolvedLine { span, exact: true });
    }

    let trimmed = detection.trimmed_text();
    if trimmed.len() != detection.source_text.len()
        && let Some(span) = find_text_within(
            doc,
            trimmed,
            line_start..=line_start + detection.leading,
        )
    {
        return Some(ResolvedLine { span, exact: false });
    }

    None
}
