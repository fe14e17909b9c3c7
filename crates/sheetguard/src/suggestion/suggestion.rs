//! Fix suggestion type.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::transform::RowFix;
use crate::validation::{ErrorKind, Severity};

/// Suggester name of the built-in rule-based generator.
pub const RULE_ENGINE: &str = "rule_engine";

/// A proposed column-value replacement and the rows it applies to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixSuggestion {
    /// `"<kind>: <message>"` summary.
    pub description: String,

    /// Kind of the error this suggestion fixes.
    pub kind: ErrorKind,

    /// Sheet the changes apply to.
    pub sheet_name: String,

    /// Column to new value.
    pub changes: IndexMap<String, Value>,

    /// Row the originating error points at.
    pub applies_to_row: usize,

    /// Every row the changes should be applied to. Never empty.
    pub affected_rows: Vec<usize>,

    /// Confidence in this suggestion (0.0-1.0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    /// Why the new value was chosen.
    pub explanation: String,

    /// Severity of the originating error.
    pub severity: Severity,

    /// What generated this suggestion.
    pub suggester: String,
}

impl FixSuggestion {
    /// Create a suggestion for a single row.
    pub fn new(
        kind: ErrorKind,
        sheet_name: impl Into<String>,
        row_index: usize,
        description: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            kind,
            sheet_name: sheet_name.into(),
            changes: IndexMap::new(),
            applies_to_row: row_index,
            affected_rows: vec![row_index],
            confidence: None,
            explanation: String::new(),
            severity: Severity::Critical,
            suggester: RULE_ENGINE.to_string(),
        }
    }

    /// Add a column change.
    pub fn with_change(mut self, column: impl Into<String>, value: Value) -> Self {
        self.changes.insert(column.into(), value);
        self
    }

    /// Set the affected rows.
    pub fn with_affected_rows(mut self, rows: Vec<usize>) -> Self {
        self.affected_rows = rows;
        self
    }

    /// Set the confidence.
    pub fn with_confidence(mut self, confidence: Option<f64>) -> Self {
        self.confidence = confidence;
        self
    }

    /// Set the explanation.
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    /// Set the severity.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Set the suggester name.
    pub fn with_suggester(mut self, suggester: impl Into<String>) -> Self {
        self.suggester = suggester.into();
        self
    }

    /// Whether the suggestion changes more than one row.
    pub fn is_bulk(&self) -> bool {
        self.affected_rows.len() > 1
    }

    /// Expand into one row fix per affected row.
    pub fn row_fixes(&self) -> Vec<RowFix> {
        self.affected_rows
            .iter()
            .map(|&row_index| RowFix::new(&self.sheet_name, row_index, self.changes.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_suggestion() {
        let sug = FixSuggestion::new(ErrorKind::OutOfRange, "clients", 4, "out_of_range: too high")
            .with_change("PriorityLevel", json!(5))
            .with_affected_rows(vec![1, 4])
            .with_explanation("Adjusted to valid range");

        assert_eq!(sug.applies_to_row, 4);
        assert!(sug.is_bulk());
        assert_eq!(sug.suggester, RULE_ENGINE);
        assert_eq!(sug.changes.get("PriorityLevel"), Some(&json!(5)));
    }

    #[test]
    fn test_row_fixes_cover_affected_rows() {
        let sug = FixSuggestion::new(ErrorKind::InvalidJson, "clients", 0, "invalid_json: bad")
            .with_change("AttributesJSON", json!("{}"))
            .with_affected_rows(vec![0, 2]);

        let fixes = sug.row_fixes();

        assert_eq!(fixes.len(), 2);
        assert_eq!(fixes[1].sheet_name, "clients");
        assert_eq!(fixes[1].row_index, 2);
        assert_eq!(fixes[1].changes.get("AttributesJSON"), Some(&json!("{}")));
    }
}
