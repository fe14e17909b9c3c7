//! Applying accepted fixes to a dataset snapshot.

mod engine;
mod operations;

pub use engine::{apply_fixes, apply_fixes_to_rows, apply_suggestions};
pub use operations::RowFix;
