use serde::Serialize;

use crate::editing::{
    builder::EditBuilder,
    local::{EditError, LocalDocument},
    operations::EditOperation,
};
use crate::models::result::ConversionCounts;
use crate::parsing::scanner::MarkerScanner;

/// What a conversion would send, computed against a local copy of the text.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionPlan {
    pub counts: ConversionCounts,
    pub block_requests: Vec<EditOperation>,
    pub bold_requests: Vec<EditOperation>,
    /// The text after both batches.
    pub text: String,
    #[serde(skip)]
    pub document: LocalDocument,
}

impl ConversionPlan {
    pub fn is_empty(&self) -> bool {
        self.block_requests.is_empty() && self.bold_requests.is_empty()
    }
}

/// Runs the two-pass conversion against `text` without a remote editor.
///
/// The bold batch is built from the document as it stands after the block
/// batch, the same way a live conversion re-fetches between passes.
pub fn plan_conversion(
    scanner: &MarkerScanner,
    builder: &EditBuilder,
    text: &str,
) -> Result<ConversionPlan, EditError> {
    let mut document = LocalDocument::from_text(text);
    let before = document.to_docs_document("local");

    let lines: Vec<_> = scanner.scan_lines(&before.flatten_text()).collect();
    let bold_found = scanner.scan_bold(&before).len();
    let counts = ConversionCounts::tally(&lines, bold_found);

    let block_requests = builder.block_requests(&before, &lines);
    document.apply_all(&block_requests)?;

    let after_blocks = document.to_docs_document("local");
    let bold_requests = builder.bold_requests(&scanner.scan_bold(&after_blocks));
    document.apply_all(&bold_requests)?;

    Ok(ConversionPlan {
        counts,
        block_requests,
        bold_requests,
        text: document.text(),
        document,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::operations::NamedStyle;
    use pretty_assertions::assert_eq;

    #[test]
    fn plans_mixed_document() {
        let plan = plan_conversion(
            &MarkerScanner::default(),
            &EditBuilder::default(),
            "# H1\n- item\n**b**",
        )
        .unwrap();

        assert_eq!(
            plan.counts,
            ConversionCounts {
                headings: 1,
                lists: 1,
                bold: 1
            }
        );
        assert_eq!(plan.block_requests.len(), 4);
        assert_eq!(plan.bold_requests.len(), 3);
        assert_eq!(plan.text, "H1\nitem\nb\n");

        let paragraphs = plan.document.paragraphs();
        assert_eq!(paragraphs[0].style, NamedStyle::Heading1);
        assert!(paragraphs[1].bullet.is_some());
        assert_eq!(plan.document.bold_segments(), vec!["b".to_string()]);
    }

    #[test]
    fn bold_offsets_account_for_removed_block_markers() {
        let plan = plan_conversion(
            &MarkerScanner::default(),
            &EditBuilder::default(),
            "## A **b** c",
        )
        .unwrap();

        assert_eq!(plan.text, "A b c\n");
        assert_eq!(plan.document.bold_segments(), vec!["b".to_string()]);
    }

    #[test]
    fn plain_text_plans_nothing() {
        let plan = plan_conversion(
            &MarkerScanner::default(),
            &EditBuilder::default(),
            "nothing to see",
        )
        .unwrap();

        assert!(plan.is_empty());
        assert!(plan.counts.is_empty());
        assert_eq!(plan.text, "nothing to see\n");
    }
}
