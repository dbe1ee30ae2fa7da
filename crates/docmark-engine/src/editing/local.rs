//! An in-memory document that accepts the same edit operations as the Docs API.
//!
//! Text lives in a single `xi_rope::Rope`. Deletions and insertions compile to
//! deltas; bold ranges and paragraph attributes are carried through each delta
//! with a [`Transformer`] so they keep pointing at the same text.
//!
//! Paragraph attributes are attached to the paragraph's terminating newline.
//! Deleting that newline merges the paragraph into the following one, which
//! keeps its own attributes.

use std::ops::Range;

use thiserror::Error;
use xi_rope::delta::{Builder, Transformer};
use xi_rope::{Delta, Rope, RopeInfo};

use crate::editing::operations::{EditOperation, NamedStyle, RunStyle};
use crate::models::document::{
    Body, DocsDocument, ORIGIN, Paragraph, ParagraphBullet, ParagraphElement, ParagraphStyle,
    StructuralElement, TextRun, TextStyle,
};
use crate::parsing::{
    span::Span,
    units::{byte_offset, utf16_len},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("index {index} is outside the document (end index {end})")]
    OutOfBounds { index: usize, end: usize },
    #[error("range {0:?} is empty")]
    EmptyRange(Span),
    #[error("the final newline of the document cannot be deleted")]
    TrailingNewline,
}

/// Attributes of one paragraph, anchored at its terminating newline.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ParagraphMark {
    newline: usize,
    style: Option<NamedStyle>,
    bullet: Option<String>,
}

/// A paragraph as seen from outside, newline excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalParagraph {
    pub text: String,
    pub style: NamedStyle,
    pub bullet: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LocalDocument {
    buffer: Rope,
    /// Byte ranges, sorted and non-overlapping.
    bold: Vec<Range<usize>>,
    marks: Vec<ParagraphMark>,
}

impl LocalDocument {
    /// Builds a document from plain text, appending the final newline if missing.
    pub fn from_text(text: &str) -> Self {
        let mut text = text.replace("\r\n", "\n");
        if !text.ends_with('\n') {
            text.push('\n');
        }
        Self {
            buffer: Rope::from(text),
            bold: Vec::new(),
            marks: Vec::new(),
        }
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    /// Length in Docs index units, final newline included.
    pub fn len_units(&self) -> usize {
        utf16_len(&self.text())
    }

    /// Index one past the final newline, as reported by `endIndex` of the last element.
    pub fn end_index(&self) -> usize {
        ORIGIN + self.len_units()
    }

    pub fn apply(&mut self, op: &EditOperation) -> Result<(), EditError> {
        match op {
            EditOperation::DeleteRange { range } => {
                let bytes = self.byte_range(*range)?;
                if bytes.end >= self.buffer.len() {
                    return Err(EditError::TrailingNewline);
                }
                let mut builder = Builder::new(self.buffer.len());
                builder.delete(bytes.clone());
                self.marks.retain(|mark| !bytes.contains(&mark.newline));
                self.commit(builder.build());
            }
            EditOperation::InsertText { index, text } => {
                let at = self.byte_index(*index)?;
                if at >= self.buffer.len() {
                    return Err(EditError::OutOfBounds {
                        index: *index,
                        end: self.end_index() - 1,
                    });
                }
                if text.is_empty() {
                    return Ok(());
                }
                let mut builder = Builder::new(self.buffer.len());
                builder.replace(at..at, Rope::from(text.as_str()));
                self.commit(builder.build());
            }
            EditOperation::SetRunStyle {
                range,
                style: RunStyle::Bold,
                value,
            } => {
                let bytes = self.byte_range(*range)?;
                if *value {
                    self.add_bold(bytes);
                } else {
                    self.remove_bold(bytes);
                }
            }
            EditOperation::SetBlockStyle { range, style } => {
                let bytes = self.byte_range(*range)?;
                let style = (*style != NamedStyle::NormalText).then_some(*style);
                for newline in self.newlines_touching(&bytes) {
                    self.mark_mut(newline).style = style;
                }
            }
            EditOperation::ApplyListPreset { range, preset } => {
                let bytes = self.byte_range(*range)?;
                for newline in self.newlines_touching(&bytes) {
                    self.mark_mut(newline).bullet = Some(preset.clone());
                }
            }
        }
        Ok(())
    }

    pub fn apply_all(&mut self, ops: &[EditOperation]) -> Result<(), EditError> {
        ops.iter().try_for_each(|op| self.apply(op))
    }

    pub fn paragraphs(&self) -> Vec<LocalParagraph> {
        let text = self.text();
        paragraph_ranges(&text)
            .into_iter()
            .map(|range| {
                let newline = range.end - 1;
                let mark = self.mark(newline);
                LocalParagraph {
                    text: text[range.start..newline].to_string(),
                    style: mark.and_then(|m| m.style).unwrap_or(NamedStyle::NormalText),
                    bullet: mark.and_then(|m| m.bullet.clone()),
                }
            })
            .collect()
    }

    /// Text of every bold range, in document order.
    pub fn bold_segments(&self) -> Vec<String> {
        self.bold
            .iter()
            .map(|range| self.buffer.slice_to_cow(range.clone()).into_owned())
            .collect()
    }

    /// Renders the document the way `documents.get` would return it.
    ///
    /// A section break occupies index 0, then one structural element per
    /// paragraph with runs split wherever bold starts or stops.
    pub fn to_docs_document(&self, document_id: &str) -> DocsDocument {
        let text = self.text();
        let mut content = vec![StructuralElement {
            end_index: Some(ORIGIN),
            ..Default::default()
        }];
        let mut index = ORIGIN;

        for range in paragraph_ranges(&text) {
            let paragraph_start = index;
            let mut elements = Vec::new();

            for (run, bold) in self.runs_within(range.clone()) {
                let run_text = &text[run];
                let len = utf16_len(run_text);
                elements.push(ParagraphElement {
                    start_index: Some(index),
                    end_index: Some(index + len),
                    text_run: Some(TextRun {
                        content: run_text.to_string(),
                        text_style: bold.then_some(TextStyle { bold: Some(true) }),
                    }),
                });
                index += len;
            }

            let mark = self.mark(range.end - 1);
            let style = mark.and_then(|m| m.style).unwrap_or(NamedStyle::NormalText);
            content.push(StructuralElement {
                start_index: Some(paragraph_start),
                end_index: Some(index),
                paragraph: Some(Paragraph {
                    elements,
                    paragraph_style: Some(ParagraphStyle {
                        named_style_type: Some(style.as_str().to_string()),
                    }),
                    bullet: mark.and_then(|m| m.bullet.clone()).map(|preset| ParagraphBullet {
                        list_id: Some(preset),
                    }),
                }),
            });
        }

        DocsDocument {
            document_id: Some(document_id.to_string()),
            title: None,
            body: Body { content },
        }
    }

    fn commit(&mut self, delta: Delta<RopeInfo>) {
        let mut transformer = Transformer::new(&delta);
        self.buffer = delta.apply(&self.buffer);

        self.bold = std::mem::take(&mut self.bold)
            .into_iter()
            .map(|range| {
                // insertions at either edge stay outside the range
                let start = transformer.transform(range.start, true);
                let end = transformer.transform(range.end, false);
                start..end
            })
            .filter(|range| range.start < range.end)
            .collect();
        for mark in &mut self.marks {
            mark.newline = transformer.transform(mark.newline, true);
        }
    }

    fn byte_index(&self, index: usize) -> Result<usize, EditError> {
        let text = self.text();
        let out_of_bounds = || EditError::OutOfBounds {
            index,
            end: ORIGIN + utf16_len(&text),
        };
        let units = index.checked_sub(ORIGIN).ok_or_else(out_of_bounds)?;
        byte_offset(&text, units).ok_or_else(out_of_bounds)
    }

    fn byte_range(&self, range: Span) -> Result<Range<usize>, EditError> {
        if range.is_empty() {
            return Err(EditError::EmptyRange(range));
        }
        Ok(self.byte_index(range.start)?..self.byte_index(range.end)?)
    }

    fn add_bold(&mut self, range: Range<usize>) {
        let mut merged = range;
        let mut kept = Vec::with_capacity(self.bold.len() + 1);
        for existing in std::mem::take(&mut self.bold) {
            if existing.end < merged.start || existing.start > merged.end {
                kept.push(existing);
            } else {
                merged = merged.start.min(existing.start)..merged.end.max(existing.end);
            }
        }
        kept.push(merged);
        kept.sort_by_key(|range| range.start);
        self.bold = kept;
    }

    fn remove_bold(&mut self, range: Range<usize>) {
        self.bold = std::mem::take(&mut self.bold)
            .into_iter()
            .flat_map(|existing| {
                let before = existing.start..existing.end.min(range.start);
                let after = existing.start.max(range.end)..existing.end;
                [before, after]
            })
            .filter(|piece| piece.start < piece.end)
            .collect();
    }

    /// Newline positions of every paragraph that overlaps `range`.
    fn newlines_touching(&self, range: &Range<usize>) -> Vec<usize> {
        let text = self.text();
        paragraph_ranges(&text)
            .into_iter()
            .filter(|paragraph| paragraph.start < range.end && range.start < paragraph.end)
            .map(|paragraph| paragraph.end - 1)
            .collect()
    }

    fn mark(&self, newline: usize) -> Option<&ParagraphMark> {
        self.marks.iter().find(|mark| mark.newline == newline)
    }

    fn mark_mut(&mut self, newline: usize) -> &mut ParagraphMark {
        let position = match self.marks.iter().position(|mark| mark.newline == newline) {
            Some(position) => position,
            None => {
                self.marks.push(ParagraphMark {
                    newline,
                    style: None,
                    bullet: None,
                });
                self.marks.len() - 1
            }
        };
        &mut self.marks[position]
    }

    /// Splits `paragraph` into `(range, bold)` pieces.
    fn runs_within(&self, paragraph: Range<usize>) -> Vec<(Range<usize>, bool)> {
        let mut runs = Vec::new();
        let mut cursor = paragraph.start;

        for bold in &self.bold {
            let start = bold.start.max(paragraph.start);
            let end = bold.end.min(paragraph.end);
            if start >= end {
                continue;
            }
            if cursor < start {
                runs.push((cursor..start, false));
            }
            runs.push((start..end, true));
            cursor = end;
        }
        if cursor < paragraph.end {
            runs.push((cursor..paragraph.end, false));
        }

        runs
    }
}

/// Byte ranges of each paragraph, terminating newline included.
fn paragraph_ranges(text: &str) -> Vec<Range<usize>> {
    let mut start = 0;
    text.split_inclusive('\n')
        .map(|paragraph| {
            let range = start..start + paragraph.len();
            start = range.end;
            range
        })
        .collect()
}
