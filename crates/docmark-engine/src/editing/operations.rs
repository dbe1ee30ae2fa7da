use serde::{Serialize, Serializer};
use serde_json::{Value, json};

use crate::models::detection::HeadingLevel;
use crate::parsing::span::Span;

/// Named paragraph styles the converter assigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NamedStyle {
    NormalText,
    Heading1,
    Heading2,
    Heading3,
}

impl NamedStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            NamedStyle::NormalText => "NORMAL_TEXT",
            NamedStyle::Heading1 => "HEADING_1",
            NamedStyle::Heading2 => "HEADING_2",
            NamedStyle::Heading3 => "HEADING_3",
        }
    }
}

impl From<HeadingLevel> for NamedStyle {
    fn from(level: HeadingLevel) -> Self {
        match level {
            HeadingLevel::One => NamedStyle::Heading1,
            HeadingLevel::Two => NamedStyle::Heading2,
            HeadingLevel::Three => NamedStyle::Heading3,
        }
    }
}

/// Character-level style fields that can be toggled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunStyle {
    Bold,
}

impl RunStyle {
    pub fn field(self) -> &'static str {
        match self {
            RunStyle::Bold => "bold",
        }
    }
}

/// One positional mutation of the authoritative document.
///
/// A batch is applied in order; builders emit operations so that earlier
/// ones never shift the offsets later ones target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOperation {
    SetBlockStyle { range: Span, style: NamedStyle },
    SetRunStyle { range: Span, style: RunStyle, value: bool },
    ApplyListPreset { range: Span, preset: String },
    DeleteRange { range: Span },
    InsertText { index: usize, text: String },
}

impl EditOperation {
    /// The batchUpdate request object for this operation.
    pub fn to_request(&self) -> Value {
        match self {
            EditOperation::SetBlockStyle { range, style } => json!({
                "updateParagraphStyle": {
                    "fields": "namedStyleType",
                    "paragraphStyle": { "namedStyleType": style.as_str() },
                    "range": range_json(*range),
                }
            }),
            EditOperation::SetRunStyle {
                range,
                style,
                value,
            } => json!({
                "updateTextStyle": {
                    "fields": style.field(),
                    "range": range_json(*range),
                    "textStyle": { style.field(): value },
                }
            }),
            EditOperation::ApplyListPreset { range, preset } => json!({
                "createParagraphBullets": {
                    "bulletPreset": preset,
                    "range": range_json(*range),
                }
            }),
            EditOperation::DeleteRange { range } => json!({
                "deleteContentRange": { "range": range_json(*range) }
            }),
            EditOperation::InsertText { index, text } => json!({
                "insertText": {
                    "location": { "index": index },
                    "text": text,
                }
            }),
        }
    }

    /// The range this operation touches, if it is range-based.
    pub fn range(&self) -> Option<Span> {
        match self {
            EditOperation::SetBlockStyle { range, .. }
            | EditOperation::SetRunStyle { range, .. }
            | EditOperation::ApplyListPreset { range, .. }
            | EditOperation::DeleteRange { range } => Some(*range),
            EditOperation::InsertText { .. } => None,
        }
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, EditOperation::DeleteRange { .. })
    }
}

fn range_json(range: Span) -> Value {
    json!({ "endIndex": range.end, "startIndex": range.start })
}

impl Serialize for EditOperation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_request().serialize(serializer)
    }
}

/// Body of a `documents.batchUpdate` call.
#[derive(Debug, Serialize)]
pub struct BatchUpdate<'a> {
    pub requests: &'a [EditOperation],
}

impl<'a> BatchUpdate<'a> {
    pub fn new(requests: &'a [EditOperation]) -> Self {
        Self { requests }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_json_snapshot;

    #[test]
    fn heading_style_request_shape() {
        let op = EditOperation::SetBlockStyle {
            range: Span::new(1, 8),
            style: NamedStyle::Heading1,
        };
        assert_json_snapshot!(op, @r###"
        {
          "updateParagraphStyle": {
            "fields": "namedStyleType",
            "paragraphStyle": {
              "namedStyleType": "HEADING_1"
            },
            "range": {
              "endIndex": 8,
              "startIndex": 1
            }
          }
        }
        "###);
    }

    #[test]
    fn bold_and_delete_batch_shape() {
        let ops = vec![
            EditOperation::SetRunStyle {
                range: Span::new(12, 16),
                style: RunStyle::Bold,
                value: true,
            },
            EditOperation::DeleteRange {
                range: Span::new(16, 18),
            },
        ];
        assert_json_snapshot!(BatchUpdate::new(&ops), @r###"
        {
          "requests": [
            {
              "updateTextStyle": {
                "fields": "bold",
                "range": {
                  "endIndex": 16,
                  "startIndex": 12
                },
                "textStyle": {
                  "bold": true
                }
              }
            },
            {
              "deleteContentRange": {
                "range": {
                  "endIndex": 18,
                  "startIndex": 16
                }
              }
            }
          ]
        }
        "###);
    }

    #[test]
    fn list_and_insert_requests() {
        let bullets = EditOperation::ApplyListPreset {
            range: Span::new(3, 9),
            preset: "BULLET_DISC_CIRCLE_SQUARE".to_string(),
        };
        assert_eq!(
            bullets.to_request()["createParagraphBullets"]["bulletPreset"],
            "BULLET_DISC_CIRCLE_SQUARE"
        );

        let insert = EditOperation::InsertText {
            index: 1,
            text: "hello".to_string(),
        };
        assert_eq!(insert.to_request()["insertText"]["location"]["index"], 1);
        assert_eq!(insert.range(), None);
    }

    #[test]
    fn heading_levels_map_to_api_names() {
        assert_eq!(NamedStyle::from(HeadingLevel::One).as_str(), "HEADING_1");
        assert_eq!(NamedStyle::from(HeadingLevel::Two).as_str(), "HEADING_2");
        assert_eq!(NamedStyle::from(HeadingLevel::Three).as_str(), "HEADING_3");
        assert_eq!(NamedStyle::NormalText.as_str(), "NORMAL_TEXT");
    }
}
