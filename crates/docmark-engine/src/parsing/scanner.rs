use crate::models::{
    detection::{BoldDetection, LineDetection},
    document::DocsDocument,
};
use crate::parsing::{
    rules::{RuleTable, bold_regex},
    span::Span,
    units::{utf16_len, utf16_offset},
};

/// Finds Markdown markers in flattened text and in document runs.
#[derive(Debug, Clone, Default)]
pub struct MarkerScanner {
    rules: RuleTable,
}

impl MarkerScanner {
    pub fn new(rules: RuleTable) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Lazily yields one detection per marked line of `text`, in line order.
    ///
    /// The iterator is finite and cloneable; calling `scan_lines` again
    /// restarts from the first line.
    pub fn scan_lines<'s, 't>(&'s self, text: &'t str) -> LineDetections<'s, 't> {
        LineDetections {
            rules: &self.rules,
            lines: text.split('\n'),
            line: 0,
            offset: 0,
        }
    }

    /// Bold spans of every text run, in document order.
    ///
    /// Each run is scanned on its own, so a span whose markers fall in two
    /// different runs is not detected.
    pub fn scan_bold(&self, doc: &DocsDocument) -> Vec<BoldDetection> {
        scan_bold(doc)
    }
}

/// Iterator returned by [`MarkerScanner::scan_lines`].
#[derive(Debug, Clone)]
pub struct LineDetections<'s, 't> {
    rules: &'s RuleTable,
    lines: std::str::Split<'t, char>,
    line: usize,
    offset: usize,
}

impl Iterator for LineDetections<'_, '_> {
    type Item = LineDetection;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let raw = self.lines.next()?;
            let line = self.line;
            let offset = self.offset;
            self.line += 1;
            // +1 for the '\n' consumed by split
            self.offset += utf16_len(raw) + 1;

            let trimmed = raw.trim();
            if trimmed.is_empty() {
                continue;
            }
            let Some((kind, symbol)) = self.rules.classify(trimmed) else {
                continue;
            };

            let indent = &raw[..raw.len() - raw.trim_start().len()];
            return Some(LineDetection {
                kind,
                source_text: raw.to_string(),
                line,
                offset,
                leading: utf16_len(indent),
                symbol: symbol.to_string(),
            });
        }
    }
}

/// See [`MarkerScanner::scan_bold`].
pub fn scan_bold(doc: &DocsDocument) -> Vec<BoldDetection> {
    let mut detections = Vec::new();

    for element in doc.runs() {
        let Some(content) = element.text() else {
            continue;
        };
        let Some(base) = element.start_index else {
            log::debug!("Skipping text run without a start index");
            continue;
        };

        for caps in bold_regex().captures_iter(content) {
            let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            detections.push(BoldDetection {
                outer: Span::new(
                    base + utf16_offset(content, whole.start()),
                    base + utf16_offset(content, whole.end()),
                ),
                inner: Span::new(
                    base + utf16_offset(content, inner.start()),
                    base + utf16_offset(content, inner.end()),
                ),
                inner_text: inner.as_str().to_string(),
            });
        }
    }

    detections
}
