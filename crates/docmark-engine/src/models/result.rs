use serde::{Deserialize, Serialize};

use crate::models::detection::LineDetection;

/// Inbound actions of the message surface.
///
/// Serialized as `{"action": "convertMarkdown"}` / `{"action": "undoConversion"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    ConvertMarkdown,
    UndoConversion,
}

/// How many markers of each family a run converted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionCounts {
    pub headings: usize,
    pub lists: usize,
    pub bold: usize,
}

impl ConversionCounts {
    pub fn tally(lines: &[LineDetection], bold: usize) -> Self {
        Self {
            headings: lines.iter().filter(|d| d.kind.is_heading()).count(),
            lists: lines.iter().filter(|d| d.kind.is_list()).count(),
            bold,
        }
    }

    pub fn total(&self) -> usize {
        self.headings + self.lists + self.bold
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Terminal value of every conversion or undo, returned across the message boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub success: bool,
    pub message: String,
    #[serde(rename = "details", default, skip_serializing_if = "Option::is_none")]
    pub counts: Option<ConversionCounts>,
}

impl ConversionResult {
    pub fn converted(counts: ConversionCounts) -> Self {
        Self {
            success: true,
            message: format!("Converted {} Markdown markers", counts.total()),
            counts: Some(counts),
        }
    }

    /// Not a failure of the system: the document simply had nothing to convert.
    pub fn no_markers() -> Self {
        Self {
            success: false,
            message: "No Markdown markers found".to_string(),
            counts: None,
        }
    }

    pub fn restored() -> Self {
        Self {
            success: true,
            message: "Restored the document to its state before conversion".to_string(),
            counts: None,
        }
    }

    pub fn failure(error: impl std::fmt::Display) -> Self {
        Self {
            success: false,
            message: format!("Error: {error}"),
            counts: None,
        }
    }
}
