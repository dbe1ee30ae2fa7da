//! The subset of the Docs API document resource the converter reads.
//!
//! Unknown fields in API responses are ignored, so the same types decode a
//! full `documents.get` body and the compact documents rendered by
//! [`LocalDocument`](crate::editing::local::LocalDocument).

use serde::{Deserialize, Serialize};

/// First addressable index of a document body. Index 0 is reserved.
pub const ORIGIN: usize = 1;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocsDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Body,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Body {
    #[serde(default)]
    pub content: Vec<StructuralElement>,
}

/// A top-level block. Only paragraphs carry text the converter looks at;
/// section breaks and tables decode with `paragraph: None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph: Option<Paragraph>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    #[serde(default)]
    pub elements: Vec<ParagraphElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph_style: Option<ParagraphStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullet: Option<ParagraphBullet>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub named_style_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphBullet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_id: Option<String>,
}

/// A run-level element. Inline objects and auto text decode with `text_run: None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_run: Option<TextRun>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_style: Option<TextStyle>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
}

impl ParagraphElement {
    /// The run's text, if this element is a non-empty text run.
    pub fn text(&self) -> Option<&str> {
        self.text_run
            .as_ref()
            .map(|run| run.content.as_str())
            .filter(|content| !content.is_empty())
    }

    pub fn is_bold(&self) -> bool {
        self.text_run
            .as_ref()
            .and_then(|run| run.text_style.as_ref())
            .and_then(|style| style.bold)
            .unwrap_or(false)
    }
}

impl Paragraph {
    pub fn named_style(&self) -> Option<&str> {
        self.paragraph_style
            .as_ref()
            .and_then(|style| style.named_style_type.as_deref())
    }

    /// Concatenated text of the paragraph's runs.
    pub fn text(&self) -> String {
        self.elements.iter().filter_map(ParagraphElement::text).collect()
    }
}

impl DocsDocument {
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.body
            .content
            .iter()
            .filter_map(|element| element.paragraph.as_ref())
    }

    /// Every non-empty text run, in document order.
    pub fn runs(&self) -> impl Iterator<Item = &ParagraphElement> {
        self.paragraphs()
            .flat_map(|paragraph| paragraph.elements.iter())
            .filter(|element| element.text().is_some())
    }

    /// The document's text with every run concatenated in order.
    ///
    /// This is the flattened representation line markers are scanned in.
    pub fn flatten_text(&self) -> String {
        self.runs().filter_map(ParagraphElement::text).collect()
    }

    /// End index of the last structural element, when the API reported one.
    pub fn end_index(&self) -> Option<usize> {
        self.body.content.last().and_then(|element| element.end_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const API_BODY: &str = r##"{
        "documentId": "abc123",
        "title": "Notes",
        "revisionId": "ignored",
        "body": {
            "content": [
                { "endIndex": 1, "sectionBreak": { "sectionStyle": {} } },
                {
                    "startIndex": 1,
                    "endIndex": 9,
                    "paragraph": {
                        "elements": [
                            {
                                "startIndex": 1,
                                "endIndex": 9,
                                "textRun": { "content": "# Title\n", "textStyle": {} }
                            }
                        ],
                        "paragraphStyle": { "namedStyleType": "NORMAL_TEXT", "direction": "LEFT_TO_RIGHT" }
                    }
                },
                {
                    "startIndex": 9,
                    "endIndex": 20,
                    "paragraph": {
                        "elements": [
                            { "startIndex": 9, "endIndex": 13, "textRun": { "content": "some" } },
                            { "startIndex": 13, "endIndex": 20, "textRun": { "content": " words\n", "textStyle": { "bold": true } } }
                        ]
                    }
                }
            ]
        }
    }"##;

    #[test]
    fn decodes_api_body_and_ignores_unknown_fields() {
        let doc: DocsDocument = serde_json::from_str(API_BODY).unwrap();

        assert_eq!(doc.document_id.as_deref(), Some("abc123"));
        assert_eq!(doc.body.content.len(), 3);
        assert_eq!(doc.paragraphs().count(), 2);
        assert_eq!(doc.runs().count(), 3);
        assert_eq!(doc.end_index(), Some(20));
    }

    #[test]
    fn flatten_text_concatenates_runs() {
        let doc: DocsDocument = serde_json::from_str(API_BODY).unwrap();
        assert_eq!(doc.flatten_text(), "# Title\nsome words\n");
    }

    #[test]
    fn paragraph_accessors() {
        let doc: DocsDocument = serde_json::from_str(API_BODY).unwrap();
        let paragraphs: Vec<_> = doc.paragraphs().collect();

        assert_eq!(paragraphs[0].named_style(), Some("NORMAL_TEXT"));
        assert_eq!(paragraphs[1].text(), "some words\n");
        assert!(paragraphs[1].elements[1].is_bold());
        assert!(!paragraphs[1].elements[0].is_bold());
    }

    #[test]
    fn empty_body_decodes() {
        let doc: DocsDocument = serde_json::from_str("{}").unwrap();
        assert_eq!(doc.flatten_text(), "");
        assert_eq!(doc.end_index(), None);
    }
}
