use serde::{Deserialize, Serialize};

/// A half-open range `[start, end)` in the document's index space.
///
/// Indices are UTF-16 code units counted from the document origin, which is
/// what the Docs API addresses. Spans are produced once and never mutated;
/// edits produce new spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Inclusive start index.
    pub start: usize,
    /// Exclusive end index.
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A span of `len` units starting at `start`.
    pub fn at(start: usize, len: usize) -> Self {
        Self {
            start,
            end: start + len,
        }
    }

    /// Returns the length in units. Uses saturating subtraction for safety.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span is empty (start >= end).
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// True when the two spans share at least one unit.
    #[must_use]
    pub fn overlaps(self, other: Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_saturates_on_inverted_span() {
        assert_eq!(Span::new(5, 3).len(), 0);
        assert!(Span::new(5, 3).is_empty());
    }

    #[test]
    fn at_builds_from_length() {
        assert_eq!(Span::at(10, 2), Span::new(10, 12));
    }

    #[test]
    fn adjacent_spans_do_not_overlap() {
        assert!(!Span::new(0, 2).overlaps(Span::new(2, 4)));
        assert!(Span::new(0, 3).overlaps(Span::new(2, 4)));
    }
}
