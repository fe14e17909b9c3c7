//! Duplicate identifier detection.

use indexmap::IndexMap;

use crate::input::value::cell_text;
use crate::input::Row;

use super::issue::{ErrorKind, ValidationError};

/// Report every row whose identifier is shared with another row.
///
/// One `duplicate_id` error is emitted per offending row, not per group, so
/// each row can be highlighted on its own. Blank identifiers are not
/// reported here.
pub fn check_duplicate_ids(rows: &[Row], id_field: &str, sheet_name: &str) -> Vec<ValidationError> {
    let mut id_rows: IndexMap<String, Vec<usize>> = IndexMap::new();

    for (row_index, row) in rows.iter().enumerate() {
        id_rows
            .entry(cell_text(row.get(id_field)))
            .or_default()
            .push(row_index);
    }

    id_rows
        .iter()
        .filter(|(id, indexes)| !id.is_empty() && indexes.len() > 1)
        .flat_map(|(id, indexes)| {
            indexes.iter().map(move |&row_index| {
                ValidationError::cell(
                    ErrorKind::DuplicateId,
                    sheet_name,
                    row_index,
                    id_field,
                    format!("Duplicate {} found: {}", id_field, id),
                )
                .with_current_value(rows[row_index].get(id_field))
            })
        })
        .collect()
}
