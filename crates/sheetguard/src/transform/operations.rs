//! Fix operation types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Column changes for a single row of a sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowFix {
    /// Sheet holding the row.
    pub sheet_name: String,
    /// 0-based row position in the snapshot the fix was computed against.
    pub row_index: usize,
    /// Column to new value, merged over the existing row.
    pub changes: IndexMap<String, Value>,
}

impl RowFix {
    /// Create a row fix.
    pub fn new(
        sheet_name: impl Into<String>,
        row_index: usize,
        changes: IndexMap<String, Value>,
    ) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            row_index,
            changes,
        }
    }

    /// Create a row fix that sets one column.
    pub fn single(
        sheet_name: impl Into<String>,
        row_index: usize,
        column: impl Into<String>,
        value: Value,
    ) -> Self {
        let mut changes = IndexMap::new();
        changes.insert(column.into(), value);
        Self::new(sheet_name, row_index, changes)
    }
}
