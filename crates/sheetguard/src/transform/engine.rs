//! Pure fix application.
//!
//! Fixes never mutate their input: every function returns a new snapshot,
//! which has to be revalidated before its row indices are used again.

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::input::{Dataset, Row};
use crate::suggestion::FixSuggestion;

use super::operations::RowFix;

/// Apply fixes to a list of rows, ignoring the fixes' sheet names.
///
/// Fixes pointing past the last row are skipped. Existing columns keep their
/// position; new columns are appended.
pub fn apply_fixes_to_rows(rows: &[Row], fixes: &[RowFix]) -> Vec<Row> {
    let mut updated = rows.to_vec();
    for fix in fixes {
        let Some(row) = updated.get_mut(fix.row_index) else {
            debug!(row = fix.row_index, "skipping fix for missing row");
            continue;
        };
        merge_changes(row, &fix.changes);
    }
    updated
}

/// Apply fixes to the sheets they name.
///
/// Fixes for unknown sheets or missing rows are skipped.
pub fn apply_fixes(dataset: &Dataset, fixes: &[RowFix]) -> Dataset {
    let mut updated = dataset.clone();
    let mut applied = 0usize;

    for fix in fixes {
        let Some(sheet) = updated.sheet_mut(&fix.sheet_name) else {
            debug!(sheet = %fix.sheet_name, "skipping fix for unknown sheet");
            continue;
        };
        let Some(row) = sheet.rows.get_mut(fix.row_index) else {
            debug!(sheet = %fix.sheet_name, row = fix.row_index, "skipping fix for missing row");
            continue;
        };
        merge_changes(row, &fix.changes);
        applied += 1;
    }

    debug!(applied, skipped = fixes.len() - applied, "fixes applied");
    updated
}

/// Apply every affected row of each suggestion.
pub fn apply_suggestions(dataset: &Dataset, suggestions: &[FixSuggestion]) -> Dataset {
    let fixes: Vec<RowFix> = suggestions.iter().flat_map(FixSuggestion::row_fixes).collect();
    apply_fixes(dataset, &fixes)
}

/// Overwrite existing columns in place and append new ones.
fn merge_changes(row: &mut Row, changes: &IndexMap<String, Value>) {
    for (column, value) in changes {
        row.insert(column.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(values: Vec<Value>) -> Vec<Row> {
        values
            .into_iter()
            .map(|v| serde_json::from_value(v).unwrap())
            .collect()
    }

    #[test]
    fn test_changes_merge_over_row() {
        let data = rows(vec![json!({"ClientID": "C1", "PriorityLevel": 9})]);
        let fixes = vec![
            RowFix::single("clients", 0, "PriorityLevel", json!(5)),
            RowFix::single("clients", 0, "AttributesJSON", json!("{}")),
        ];

        let updated = apply_fixes_to_rows(&data, &fixes);

        let keys: Vec<_> = updated[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["ClientID", "PriorityLevel", "AttributesJSON"]);
        assert_eq!(updated[0]["PriorityLevel"], json!(5));
        // Input untouched
        assert_eq!(data[0]["PriorityLevel"], json!(9));
    }

    #[test]
    fn test_row_and_dataset_application_agree() {
        let data = rows(vec![
            json!({"WorkerID": "W1", "MaxLoadPerPhase": 4}),
            json!({"WorkerID": "W2", "MaxLoadPerPhase": 2}),
        ]);
        let fixes = vec![
            RowFix::single("workers", 0, "MaxLoadPerPhase", json!(2)),
            RowFix::single("workers", 0, "Skills", json!("welding")),
            RowFix::single("workers", 9, "MaxLoadPerPhase", json!(1)),
        ];

        let by_rows = apply_fixes_to_rows(&data, &fixes);
        let by_dataset = apply_fixes(&Dataset::new().with_sheet("workers", data), &fixes);

        assert_eq!(by_dataset.sheet("workers").unwrap().rows, by_rows);
    }

    #[test]
    fn test_out_of_range_row_is_ignored() {
        let data = rows(vec![json!({"TaskID": "T1"})]);
        let fixes = vec![RowFix::single("tasks", 3, "TaskID", json!("T9"))];

        assert_eq!(apply_fixes_to_rows(&data, &fixes), data);
    }

    #[test]
    fn test_apply_to_named_sheets() {
        let dataset = Dataset::new()
            .with_sheet("clients", rows(vec![json!({"ClientID": "C1"})]))
            .with_sheet("tasks", rows(vec![json!({"TaskID": "T1"})]));
        let fixes = vec![
            RowFix::single("tasks", 0, "Duration", json!(1)),
            RowFix::single("missing", 0, "Duration", json!(1)),
        ];

        let updated = apply_fixes(&dataset, &fixes);

        assert_eq!(updated.sheet("tasks").unwrap().cell(0, "Duration"), Some(&json!(1)));
        assert_eq!(updated.sheet("clients"), dataset.sheet("clients"));
        assert!(updated.sheet("missing").is_none());
        assert!(dataset.sheet("tasks").unwrap().cell(0, "Duration").is_none());
    }

    #[test]
    fn test_apply_suggestions_covers_affected_rows() {
        use crate::validation::ErrorKind;

        let dataset = Dataset::new().with_sheet(
            "clients",
            rows(vec![
                json!({"AttributesJSON": "{bad"}),
                json!({"AttributesJSON": "{}"}),
                json!({"AttributesJSON": "{bad"}),
            ]),
        );
        let suggestion = FixSuggestion::new(ErrorKind::InvalidJson, "clients", 0, "invalid_json")
            .with_change("AttributesJSON", json!("{}"))
            .with_affected_rows(vec![0, 2]);

        let updated = apply_suggestions(&dataset, &[suggestion]);
        let sheet = updated.sheet("clients").unwrap();

        assert!(sheet.rows.iter().all(|row| row["AttributesJSON"] == json!("{}")));
    }
}
