pub mod rewrite;
pub mod rules;
pub mod scanner;
pub mod span;
pub mod units;

pub use rewrite::{Rewrite, rewrite_text};
pub use rules::{MarkerRule, RuleTable};
pub use scanner::{LineDetections, MarkerScanner, scan_bold};
pub use span::Span;
