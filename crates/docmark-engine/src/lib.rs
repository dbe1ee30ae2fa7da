pub mod convert;
pub mod editing;
pub mod io;
pub mod models;
pub mod parsing;

// Re-export key types for easier usage
pub use convert::{ConversionPlan, ConvertError, Converter, Outcome, Stage, plan_conversion};
pub use editing::{EditBuilder, EditOperation, ListPresets, LocalDocument};
pub use io::*;
pub use models::*;
pub use parsing::{MarkerScanner, Rewrite, rewrite_text};
