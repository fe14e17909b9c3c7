//! Column renaming through an explicit header mapping.
//!
//! Header matching itself happens outside the engine. This module only
//! applies a mapping that has already been decided.

use indexmap::IndexMap;

use super::source::Row;

/// Mapping target that drops a column instead of renaming it.
pub const UNKNOWN_HEADER: &str = "Unknown";

/// Rename columns of every row according to `mapping`.
///
/// Columns mapped to [`UNKNOWN_HEADER`] are dropped and columns without a
/// mapping keep their original name. An empty mapping target also keeps the
/// original name. When two columns map to the same name, the later one wins.
pub fn normalize_headers(rows: &[Row], mapping: &IndexMap<String, String>) -> Vec<Row> {
    rows.iter()
        .map(|row| {
            let mut renamed = Row::with_capacity(row.len());
            for (key, value) in row {
                match mapping.get(key).map(String::as_str) {
                    Some(UNKNOWN_HEADER) => {}
                    Some(target) if !target.is_empty() => {
                        renamed.insert(target.to_string(), value.clone());
                    }
                    _ => {
                        renamed.insert(key.clone(), value.clone());
                    }
                }
            }
            renamed
        })
        .collect()
}
