//! Conversions between Rust byte offsets and Docs API indices.
//!
//! The Docs API counts text in UTF-16 code units. Everything that leaves the
//! engine as a [`Span`](super::span::Span) is in those units; everything that
//! indexes a `&str` is in bytes.

/// Length of `s` in UTF-16 code units.
pub fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// Converts a byte offset inside `s` into a UTF-16 offset.
///
/// `byte` must lie on a char boundary.
pub fn utf16_offset(s: &str, byte: usize) -> usize {
    utf16_len(&s[..byte])
}

/// Converts a UTF-16 offset into a byte offset inside `s`.
///
/// Returns `None` when `units` points past the end or into the middle of a
/// surrogate pair.
pub fn byte_offset(s: &str, units: usize) -> Option<usize> {
    let mut seen = 0;
    for (idx, ch) in s.char_indices() {
        if seen == units {
            return Some(idx);
        }
        seen += ch.len_utf16();
        if seen > units {
            return None;
        }
    }
    (seen == units).then_some(s.len())
}
