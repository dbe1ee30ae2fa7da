use regex::Captures;
use serde::Serialize;

use crate::models::{detection::LineKind, result::ConversionCounts};
use crate::parsing::rules::{RuleTable, bold_regex};

/// Bullet glyph written in place of `-` / `*` markers.
pub const BULLET_GLYPH: &str = "• ";

/// Outcome of rewriting text in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rewrite {
    pub text: String,
    pub counts: ConversionCounts,
}

/// Rewrites marker text to plain text using the standard rule table.
///
/// Headings lose their `#` marker, bullets become `• `, numbered items are
/// kept as written, and `**bold**` loses its asterisks. Line endings are
/// normalised to `\n`.
///
/// Lines are classified with their indentation trimmed, so `"  * star"`
/// becomes `"  • star"` with the indentation kept. Each line matches at most
/// one rule: `"# - x"` is a heading with the text `"- x"`.
pub fn rewrite_text(text: &str) -> Rewrite {
    rewrite_text_with(RuleTable::standard(), text)
}

pub fn rewrite_text_with(rules: &RuleTable, text: &str) -> Rewrite {
    let mut counts = ConversionCounts::default();
    let mut lines = Vec::new();

    for raw in text.split('\n') {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        let body = raw.trim_start();
        let indent = &raw[..raw.len() - body.len()];

        let line = match rules.classify(raw.trim()) {
            Some((LineKind::Heading(_), symbol)) => {
                counts.headings += 1;
                format!("{indent}{}", &body[symbol.len()..])
            }
            Some((LineKind::Bullet, symbol)) => {
                counts.lists += 1;
                format!("{indent}{BULLET_GLYPH}{}", &body[symbol.len()..])
            }
            Some((LineKind::Numbered, _)) => {
                counts.lists += 1;
                raw.to_string()
            }
            None => raw.to_string(),
        };

        let mut bold = 0;
        let line = bold_regex()
            .replace_all(&line, |caps: &Captures<'_>| {
                bold += 1;
                caps[1].to_string()
            })
            .into_owned();
        counts.bold += bold;

        lines.push(line);
    }

    Rewrite {
        text: lines.join("\n"),
        counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn rewrites_every_marker_family() {
        let rewrite = rewrite_text("## Title\n- a\n1. b\n**x** y");

        assert_eq!(rewrite.text, "Title\n• a\n1. b\nx y");
        assert_eq!(
            rewrite.counts,
            ConversionCounts {
                headings: 1,
                lists: 2,
                bold: 1
            }
        );
    }

    #[rstest]
    #[case("### Deep", "Deep")]
    #[case("  * star", "  • star")]
    #[case("- **both**", "• both")]
    #[case("# - x", "- x")]
    #[case("# Title with **bold** and **more**", "Title with bold and more")]
    #[case("no markers here", "no markers here")]
    fn rewrites_single_lines(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(rewrite_text(input).text, expected);
    }

    #[test]
    fn normalises_crlf_and_keeps_trailing_newline() {
        let rewrite = rewrite_text("# A\r\nplain\r\n");
        assert_eq!(rewrite.text, "A\nplain\n");
    }

    #[test]
    fn plain_text_counts_nothing() {
        assert!(rewrite_text("hello\nworld").counts.is_empty());
    }
}
