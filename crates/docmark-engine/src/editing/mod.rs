//! Turning detections into positional edits, and applying edits locally.
//!
//! [`EditBuilder`] produces [`EditOperation`] batches ordered highest offset
//! first. [`LocalDocument`] applies the same operations to an in-memory rope
//! so conversions can run without a remote editor.

pub mod builder;
pub mod local;
pub mod operations;
pub mod resolve;

pub use builder::{EditBuilder, ListPresets};
pub use local::{EditError, LocalDocument, LocalParagraph};
pub use operations::{BatchUpdate, EditOperation, NamedStyle, RunStyle};
pub use resolve::{ResolvedLine, find_text_position, find_text_within, resolve_line};
