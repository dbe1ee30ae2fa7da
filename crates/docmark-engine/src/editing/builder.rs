use crate::editing::{
    operations::{EditOperation, NamedStyle, RunStyle},
    resolve::resolve_line,
};
use crate::models::{
    detection::{BoldDetection, LineDetection, LineKind},
    document::DocsDocument,
};
use crate::parsing::span::Span;

pub const DEFAULT_BULLET_PRESET: &str = "BULLET_DISC_CIRCLE_SQUARE";
pub const DEFAULT_NUMBERED_PRESET: &str = "NUMBERED_DECIMAL_ALPHA_ROMAN";

/// List presets applied to bullet and numbered lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPresets {
    pub bullet: String,
    pub numbered: String,
}

impl Default for ListPresets {
    fn default() -> Self {
        Self {
            bullet: DEFAULT_BULLET_PRESET.to_string(),
            numbered: DEFAULT_NUMBERED_PRESET.to_string(),
        }
    }
}

/// Turns detections into edit batches.
///
/// Block markers and bold markers are built as separate batches: the bold
/// batch must be computed from a document fetched after the block batch was
/// applied, because deleting block markers shifts every later offset.
#[derive(Debug, Clone, Default)]
pub struct EditBuilder {
    presets: ListPresets,
}

impl EditBuilder {
    pub fn new(presets: ListPresets) -> Self {
        Self { presets }
    }

    pub fn presets(&self) -> &ListPresets {
        &self.presets
    }

    /// Style and marker-deletion operations for heading and list lines.
    ///
    /// Detections are processed last line first. For each one the style
    /// operation precedes the deletion of the marker symbol. Lines whose
    /// text cannot be found in `doc` at the line's own offset are skipped.
    pub fn block_requests(
        &self,
        doc: &DocsDocument,
        detections: &[LineDetection],
    ) -> Vec<EditOperation> {
        let mut ops = Vec::with_capacity(detections.len() * 2);
        let mut previous: Option<Span> = None;

        for detection in detections.iter().rev() {
            let Some(resolved) = resolve_line(doc, detection) else {
                log::warn!(
                    "Text not found in document, skipping line {}: {:?}",
                    detection.line,
                    detection.source_text
                );
                continue;
            };
            debug_assert!(
                previous.is_none_or(|later| !later.overlaps(resolved.span)),
                "line {} resolved onto a range already claimed: {:?}",
                detection.line,
                resolved.span
            );
            previous = Some(resolved.span);

            ops.push(self.block_style(detection.kind, resolved.span));

            let symbol_start = if resolved.exact {
                resolved.span.start + detection.leading
            } else {
                resolved.span.start
            };
            let symbol_len = detection.symbol_len();
            if symbol_len > 0 {
                ops.push(EditOperation::DeleteRange {
                    range: Span::at(symbol_start, symbol_len),
                });
            }
        }

        ops
    }

    /// Bold styling plus removal of both marker pairs, last span first.
    ///
    /// Within one span the closing `**` is deleted before the opening one so
    /// the closing marker's offsets are still valid when it is removed.
    pub fn bold_requests(&self, detections: &[BoldDetection]) -> Vec<EditOperation> {
        let mut ops = Vec::with_capacity(detections.len() * 3);

        for detection in detections.iter().rev() {
            ops.push(EditOperation::SetRunStyle {
                range: detection.inner,
                style: RunStyle::Bold,
                value: true,
            });
            ops.push(EditOperation::DeleteRange {
                range: detection.closing_marker(),
            });
            ops.push(EditOperation::DeleteRange {
                range: detection.opening_marker(),
            });
        }

        ops
    }

    fn block_style(&self, kind: LineKind, range: Span) -> EditOperation {
        match kind {
            LineKind::Heading(level) => EditOperation::SetBlockStyle {
                range,
                style: NamedStyle::from(level),
            },
            LineKind::Bullet => EditOperation::ApplyListPreset {
                range,
                preset: self.presets.bullet.clone(),
            },
            LineKind::Numbered => EditOperation::ApplyListPreset {
                range,
                preset: self.presets.numbered.clone(),
            },
        }
    }
}
