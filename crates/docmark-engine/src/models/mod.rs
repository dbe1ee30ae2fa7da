pub mod detection;
pub mod document;
pub mod result;

pub use detection::{BoldDetection, HeadingLevel, LineDetection, LineKind};
pub use document::{DocsDocument, ORIGIN};
pub use result::{ConversionCounts, ConversionResult, Request};
