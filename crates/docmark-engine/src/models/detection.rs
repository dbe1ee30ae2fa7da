use serde::Serialize;

use crate::parsing::{span::Span, units::utf16_len};

/// Heading depth recognised by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HeadingLevel {
    One,
    Two,
    Three,
}

impl HeadingLevel {
    pub fn number(self) -> u8 {
        match self {
            HeadingLevel::One => 1,
            HeadingLevel::Two => 2,
            HeadingLevel::Three => 3,
        }
    }
}

/// Classification of a line-level marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Heading(HeadingLevel),
    Bullet,
    Numbered,
}

impl LineKind {
    pub fn is_heading(self) -> bool {
        matches!(self, LineKind::Heading(_))
    }

    pub fn is_list(self) -> bool {
        matches!(self, LineKind::Bullet | LineKind::Numbered)
    }
}

/// A heading or list marker found at the start of a line of flattened text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineDetection {
    pub kind: LineKind,
    /// The full line, original whitespace included.
    pub source_text: String,
    /// Zero-based line number in the flattened text.
    pub line: usize,
    /// Offset of the first character of the line in the flattened text (UTF-16 units).
    pub offset: usize,
    /// Width of the whitespace in front of the marker (UTF-16 units).
    pub leading: usize,
    /// The marker exactly as matched, trailing whitespace included (`"## "`, `"1.  "`).
    pub symbol: String,
}

impl LineDetection {
    /// Number of units to delete to remove the marker.
    pub fn symbol_len(&self) -> usize {
        utf16_len(&self.symbol)
    }

    pub fn trimmed_text(&self) -> &str {
        self.source_text.trim()
    }
}

/// A `**bold**` span found inside a single text run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoldDetection {
    /// Covers both marker pairs.
    pub outer: Span,
    /// Covers the content only.
    pub inner: Span,
    pub inner_text: String,
}

impl BoldDetection {
    /// Range of the closing `**`.
    pub fn closing_marker(&self) -> Span {
        Span::new(self.inner.end, self.outer.end)
    }

    /// Range of the opening `**`.
    pub fn opening_marker(&self) -> Span {
        Span::new(self.outer.start, self.inner.start)
    }
}
