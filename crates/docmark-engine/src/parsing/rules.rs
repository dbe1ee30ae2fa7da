use regex::Regex;
use std::sync::OnceLock;

use crate::models::detection::{HeadingLevel, LineKind};

/// One row of the marker table: a line kind and the pattern that recognises it.
///
/// The pattern is matched against a trimmed line and its first capture group
/// must cover exactly the marker symbol (including the whitespace after it),
/// so the number of characters to delete comes from the text itself.
#[derive(Debug, Clone)]
pub struct MarkerRule {
    pub kind: LineKind,
    pattern: Regex,
}

impl MarkerRule {
    pub fn new(kind: LineKind, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            kind,
            pattern: Regex::new(pattern)?,
        })
    }

    /// The captured marker symbol when `trimmed` starts with this marker.
    pub fn symbol<'t>(&self, trimmed: &'t str) -> Option<&'t str> {
        self.pattern
            .captures(trimmed)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// Ordered marker table. Earlier rules take precedence; a line gets the kind
/// of the first rule that matches.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<MarkerRule>,
}

impl RuleTable {
    pub fn from_rules(rules: Vec<MarkerRule>) -> Self {
        Self { rules }
    }

    /// Headings (most specific first), then bullets, then numbered items.
    pub fn standard() -> &'static RuleTable {
        static STANDARD: OnceLock<RuleTable> = OnceLock::new();
        STANDARD.get_or_init(|| {
            let rule = |kind, pattern| MarkerRule::new(kind, pattern).expect("Invalid marker regex");
            RuleTable::from_rules(vec![
                rule(LineKind::Heading(HeadingLevel::Three), r"^(###\s+)\S"),
                rule(LineKind::Heading(HeadingLevel::Two), r"^(##\s+)\S"),
                rule(LineKind::Heading(HeadingLevel::One), r"^(#\s+)\S"),
                rule(LineKind::Bullet, r"^([-*]\s+)\S"),
                rule(LineKind::Numbered, r"^(\d+\.\s+)\S"),
            ])
        })
    }

    pub fn rules(&self) -> &[MarkerRule] {
        &self.rules
    }

    /// Classifies a trimmed line, returning its kind and marker symbol.
    pub fn classify<'t>(&self, trimmed: &'t str) -> Option<(LineKind, &'t str)> {
        self.rules
            .iter()
            .find_map(|rule| rule.symbol(trimmed).map(|symbol| (rule.kind, symbol)))
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::standard().clone()
    }
}

/// Non-greedy `**...**` within a single line of text.
pub fn bold_regex() -> &'static Regex {
    static BOLD_REGEX: OnceLock<Regex> = OnceLock::new();
    BOLD_REGEX.get_or_init(|| Regex::new(r"\*\*(.+?)\*\*").expect("Invalid bold regex"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("# Title", LineKind::Heading(HeadingLevel::One), "# ")]
    #[case("## Title", LineKind::Heading(HeadingLevel::Two), "## ")]
    #[case("### Title", LineKind::Heading(HeadingLevel::Three), "### ")]
    #[case("#   Spaced", LineKind::Heading(HeadingLevel::One), "#   ")]
    #[case("- item", LineKind::Bullet, "- ")]
    #[case("* item", LineKind::Bullet, "* ")]
    #[case("1. first", LineKind::Numbered, "1. ")]
    #[case("12.  twelfth", LineKind::Numbered, "12.  ")]
    fn classifies_markers(#[case] line: &str, #[case] kind: LineKind, #[case] symbol: &str) {
        assert_eq!(RuleTable::standard().classify(line), Some((kind, symbol)));
    }

    #[rstest]
    #[case("plain text")]
    #[case("#hashtag")]
    #[case("####")]
    #[case("**bold** start")]
    #[case("-")]
    #[case("---")]
    #[case("1.5 million")]
    fn ignores_non_markers(#[case] line: &str) {
        assert_eq!(RuleTable::standard().classify(line), None);
    }

    #[test]
    fn deeper_headings_beat_shallower_ones() {
        let (kind, symbol) = RuleTable::standard().classify("### deep").unwrap();
        assert_eq!(kind, LineKind::Heading(HeadingLevel::Three));
        assert_eq!(symbol, "### ");
    }

    #[test]
    fn custom_table_changes_precedence() {
        let table = RuleTable::from_rules(vec![
            MarkerRule::new(LineKind::Bullet, r"^(\+\s+)\S").unwrap(),
        ]);
        assert_eq!(table.classify("+ plus"), Some((LineKind::Bullet, "+ ")));
        assert_eq!(table.classify("- dash"), None);
    }

    #[test]
    fn bold_regex_is_non_greedy() {
        let found: Vec<_> = bold_regex()
            .captures_iter("**a** and **b**")
            .map(|caps| caps[1].to_string())
            .collect();
        assert_eq!(found, vec!["a", "b"]);
    }
}
