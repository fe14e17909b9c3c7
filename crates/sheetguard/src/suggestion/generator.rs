//! Rule-based suggestion generation from validation errors.
//!
//! Every error that carries a suggested fix becomes a [`FixSuggestion`].
//! Fixes determined by the offending value alone are widened to every row of
//! the sheet holding that same raw value, so they can be applied in bulk.

use std::cmp::Reverse;
use std::collections::HashSet;

use serde_json::Value;

use crate::input::{Dataset, Sheet};
use crate::validation::{ErrorKind, SheetErrors, ValidationError};

use super::FixSuggestion;

/// Number of suggestions kept for presentation.
pub const DEFAULT_MAX_SUGGESTIONS: usize = 10;

/// Identity of a bulk fix: sheet, kind, column and raw value.
type BulkKey = (String, ErrorKind, String, String);

/// Generates suggestions from validation errors using rule-based logic.
pub struct SuggestionEngine;

impl SuggestionEngine {
    /// Generate suggestions, critical first, truncated to `max`.
    pub fn generate(dataset: &Dataset, errors: &SheetErrors, max: usize) -> Vec<FixSuggestion> {
        let mut suggestions = Self::generate_all(dataset, errors);
        Self::prioritize(&mut suggestions, max);
        suggestions
    }

    /// Generate every suggestion in error order, without sorting or truncation.
    pub fn generate_all(dataset: &Dataset, errors: &SheetErrors) -> Vec<FixSuggestion> {
        let mut covered: HashSet<BulkKey> = HashSet::new();
        let mut suggestions = Vec::new();

        for (sheet_name, sheet_errors) in errors {
            let sheet = dataset.sheet(sheet_name);
            for error in sheet_errors {
                if let Some(suggestion) = Self::generate_for_error(error, sheet, &mut covered) {
                    suggestions.push(suggestion);
                }
            }
        }

        suggestions
    }

    /// Order critical suggestions before warnings, keeping relative order,
    /// and keep at most `max`.
    pub fn prioritize(suggestions: &mut Vec<FixSuggestion>, max: usize) {
        suggestions.sort_by_key(|s| Reverse(s.severity));
        suggestions.truncate(max);
    }

    /// Suggestion for a single error, `None` when the error has no fix or
    /// its bulk fix was already emitted.
    fn generate_for_error(
        error: &ValidationError,
        sheet: Option<&Sheet>,
        covered: &mut HashSet<BulkKey>,
    ) -> Option<FixSuggestion> {
        let fix = error.suggested_fix.as_ref()?;

        let (column, applies_to_row, affected_rows) = match &fix.target_column {
            // Column creation fills only the rows that lack the column.
            Some(target) => {
                let rows = sheet.map_or_else(Vec::new, |sheet| matching_rows(sheet, target, None));
                (target.clone(), 0, rows)
            }
            None => {
                let column = error.column_name.clone()?;
                let row_index = error.row_index?;
                let rows = if error.affects_multiple {
                    let key = (
                        error.sheet_name.clone(),
                        error.kind,
                        column.clone(),
                        raw_key(error.current_value.as_ref()),
                    );
                    if !covered.insert(key) {
                        return None;
                    }
                    match sheet {
                        Some(sheet) => matching_rows(sheet, &column, error.current_value.as_ref()),
                        None => vec![row_index],
                    }
                } else {
                    vec![row_index]
                };
                (column, row_index, rows)
            }
        };

        if affected_rows.is_empty() {
            return None;
        }

        Some(
            FixSuggestion::new(
                error.kind,
                &error.sheet_name,
                applies_to_row,
                format!("{}: {}", error.kind, error.message),
            )
            .with_change(column, fix.value.clone())
            .with_affected_rows(affected_rows)
            .with_confidence(fix.confidence)
            .with_explanation(&fix.explanation)
            .with_severity(error.severity),
        )
    }
}

/// Rows whose raw cell in `column` equals `value` (absent matches absent).
fn matching_rows(sheet: &Sheet, column: &str, value: Option<&Value>) -> Vec<usize> {
    sheet
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.get(column) == value)
        .map(|(index, _)| index)
        .collect()
}

fn raw_key(value: Option<&Value>) -> String {
    match value {
        None => "<absent>".to_string(),
        Some(v) => v.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Row;
    use crate::validation::{Severity, SuggestedFix, ValidationEngine};
    use serde_json::json;

    fn rows(values: Vec<Value>) -> Vec<Row> {
        values
            .into_iter()
            .map(|v| serde_json::from_value(v).unwrap())
            .collect()
    }

    fn clients_dataset() -> Dataset {
        Dataset::new().with_sheet(
            "clients",
            rows(vec![
                json!({"ClientID": "C1", "ClientName": "A", "PriorityLevel": "7"}),
                json!({"ClientID": "C2", "ClientName": "B", "PriorityLevel": 2}),
                json!({"ClientID": "C3", "ClientName": "C", "PriorityLevel": "7"}),
                json!({"ClientID": "C4", "ClientName": "D", "PriorityLevel": 7}),
            ]),
        )
    }

    #[test]
    fn test_bulk_fix_covers_identical_raw_values() {
        let dataset = clients_dataset();
        let errors = ValidationEngine::new().validate(&dataset);

        let suggestions = SuggestionEngine::generate_all(&dataset, &errors);

        // invalid_format and out_of_range, each once for "7" and once for 7
        assert_eq!(suggestions.len(), 4);
        let first = &suggestions[0];
        assert_eq!(first.kind, ErrorKind::InvalidFormat);
        assert_eq!(first.affected_rows, vec![0, 2]);
        assert_eq!(first.changes.get("PriorityLevel"), Some(&json!(5)));
        assert_eq!(
            first.description,
            "invalid_format: Invalid format for PriorityLevel: 7"
        );

        let numeric = &suggestions[1];
        assert_eq!(numeric.applies_to_row, 3);
        assert_eq!(numeric.affected_rows, vec![3]);
    }

    #[test]
    fn test_column_creation_fills_rows_lacking_column() {
        let dataset = Dataset::new().with_sheet(
            "clients",
            rows(vec![
                json!({"ClientID": "C1", "ClientName": "A"}),
                json!({"ClientID": "C2", "ClientName": "B"}),
            ]),
        );
        let errors = ValidationEngine::new().validate(&dataset);

        let suggestions = SuggestionEngine::generate(&dataset, &errors, DEFAULT_MAX_SUGGESTIONS);

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].kind, ErrorKind::MissingColumn);
        assert_eq!(suggestions[0].affected_rows, vec![0, 1]);
        assert_eq!(suggestions[0].changes.get("PriorityLevel"), Some(&json!(3)));
    }

    #[test]
    fn test_column_creation_keeps_existing_values() {
        let dataset = Dataset::new().with_sheet(
            "clients",
            rows(vec![
                json!({"ClientName": "A", "PriorityLevel": 1}),
                json!({"ClientID": "C1", "ClientName": "B", "PriorityLevel": 2}),
                json!({"ClientID": "C2", "ClientName": "C", "PriorityLevel": 3}),
            ]),
        );
        let errors = ValidationEngine::new().validate(&dataset);

        let suggestions = SuggestionEngine::generate_all(&dataset, &errors);

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].kind, ErrorKind::MissingColumn);
        assert_eq!(suggestions[0].affected_rows, vec![0]);

        let fixed = crate::transform::apply_suggestions(&dataset, &suggestions);
        let sheet = fixed.sheet("clients").unwrap();
        assert_eq!(sheet.cell(0, "ClientID"), Some(&json!("NEW_ClientID")));
        assert_eq!(sheet.cell(1, "ClientID"), Some(&json!("C1")));
        assert_eq!(sheet.cell(2, "ClientID"), Some(&json!("C2")));
        let after = ValidationEngine::new().validate(&fixed);
        assert!(after["clients"].iter().all(|e| e.kind != ErrorKind::DuplicateId));
    }

    #[test]
    fn test_empty_sheet_yields_no_suggestions() {
        let dataset = Dataset::new().with_sheet("tasks", vec![]);
        let errors = ValidationEngine::new().validate(&dataset);

        assert_eq!(errors["tasks"].len(), 4);
        assert!(SuggestionEngine::generate(&dataset, &errors, 10).is_empty());
    }

    #[test]
    fn test_errors_without_fix_are_skipped() {
        let dataset = Dataset::new().with_sheet(
            "workers",
            rows(vec![
                json!({"WorkerID": "W1", "WorkerName": "A", "AvailableSlots": "[1]", "MaxLoadPerPhase": 1}),
                json!({"WorkerID": "W1", "WorkerName": "B", "AvailableSlots": "[1]", "MaxLoadPerPhase": 1}),
            ]),
        );
        let errors = ValidationEngine::new().validate(&dataset);

        assert_eq!(errors["workers"].len(), 2);
        assert!(SuggestionEngine::generate(&dataset, &errors, 10).is_empty());
    }

    #[test]
    fn test_critical_first_and_truncated() {
        let mut errors = SheetErrors::new();
        let sheet_errors = (0..15)
            .map(|i| {
                let severity = if i % 2 == 0 { Severity::Warning } else { Severity::Critical };
                ValidationError::cell(ErrorKind::WorkerOverload, "workers", i, "MaxLoadPerPhase", "x")
                    .with_severity(severity)
                    .with_fix(SuggestedFix::new(1, "Adjusted"))
            })
            .collect();
        errors.insert("workers".to_string(), sheet_errors);

        let suggestions = SuggestionEngine::generate(&Dataset::new(), &errors, 10);

        assert_eq!(suggestions.len(), 10);
        let rows: Vec<usize> = suggestions.iter().map(|s| s.applies_to_row).collect();
        assert_eq!(rows, vec![1, 3, 5, 7, 9, 11, 13, 0, 2, 4]);
    }
}
