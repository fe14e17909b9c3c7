//! Validation error types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Sheet lacks a required column.
    MissingColumn,
    /// Value fails its field's type predicate.
    InvalidFormat,
    /// Value is not a number.
    InvalidNumber,
    /// Number outside its allowed range.
    OutOfRange,
    /// Embedded JSON is malformed.
    InvalidJson,
    /// Identifier is not unique within its sheet.
    DuplicateId,
    /// Reference to an identifier that does not exist in the target sheet.
    InvalidReference,
    /// AvailableSlots is not a JSON array.
    InvalidSlotsFormat,
    /// Worker has fewer slots than its maximum load.
    WorkerOverload,
    /// No worker covers a required skill.
    MissingSkill,
    /// PreferredPhases is not a JSON array.
    InvalidPhaseFormat,
    /// Fewer qualified workers than the task's concurrency.
    InsufficientWorkers,
}

impl ErrorKind {
    /// Machine-readable name, as serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MissingColumn => "missing_column",
            ErrorKind::InvalidFormat => "invalid_format",
            ErrorKind::InvalidNumber => "invalid_number",
            ErrorKind::OutOfRange => "out_of_range",
            ErrorKind::InvalidJson => "invalid_json",
            ErrorKind::DuplicateId => "duplicate_id",
            ErrorKind::InvalidReference => "invalid_reference",
            ErrorKind::InvalidSlotsFormat => "invalid_slots_format",
            ErrorKind::WorkerOverload => "worker_overload",
            ErrorKind::MissingSkill => "missing_skill",
            ErrorKind::InvalidPhaseFormat => "invalid_phase_format",
            ErrorKind::InsufficientWorkers => "insufficient_workers",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::MissingColumn => "Missing Column",
            ErrorKind::InvalidFormat => "Invalid Format",
            ErrorKind::InvalidNumber => "Invalid Number",
            ErrorKind::OutOfRange => "Out of Range",
            ErrorKind::InvalidJson => "Invalid JSON",
            ErrorKind::DuplicateId => "Duplicate ID",
            ErrorKind::InvalidReference => "Invalid Reference",
            ErrorKind::InvalidSlotsFormat => "Invalid Slots Format",
            ErrorKind::WorkerOverload => "Worker Overload",
            ErrorKind::MissingSkill => "Missing Skill",
            ErrorKind::InvalidPhaseFormat => "Invalid Phase Format",
            ErrorKind::InsufficientWorkers => "Insufficient Workers",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity level of a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Advisory; downstream consumers still work.
    Warning,
    /// Data that will break downstream consumption.
    Critical,
}

impl Severity {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Warning => "Warning",
            Severity::Critical => "Critical",
        }
    }
}

/// Concrete replacement value for a failing cell or column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedFix {
    /// Replacement value.
    pub value: Value,
    /// Why this value was chosen.
    pub explanation: String,
    /// Confidence in the fix (0.0-1.0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Column to create, for fixes attached to sheet-level errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_column: Option<String>,
}

impl SuggestedFix {
    /// Create a fix for the cell the error points at.
    pub fn new(value: impl Into<Value>, explanation: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            explanation: explanation.into(),
            confidence: None,
            target_column: None,
        }
    }

    /// Create a fix that adds a missing column.
    pub fn create_column(
        column: impl Into<String>,
        value: impl Into<Value>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            target_column: Some(column.into()),
            ..Self::new(value, explanation)
        }
    }

    /// Set the confidence.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// A single validation failure, attributable to a sheet and, when cell
/// scoped, to a row and column.
///
/// Construct through [`ValidationError::sheet`] or [`ValidationError::cell`]:
/// a column is never present without a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// Kind of failure.
    pub kind: ErrorKind,
    /// Human-readable description.
    pub message: String,
    /// Sheet the error belongs to.
    pub sheet_name: String,
    /// Row position within the validated snapshot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_index: Option<usize>,
    /// Column the error points at.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_name: Option<String>,
    /// Severity level.
    pub severity: Severity,
    /// Raw offending cell value (absent cells are `None`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_value: Option<Value>,
    /// Whether the fix generalizes to every row with the same raw value.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub affects_multiple: bool,
    /// Proposed replacement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<SuggestedFix>,
}

impl ValidationError {
    /// Sheet-scoped error (no row, no column).
    pub fn sheet(kind: ErrorKind, sheet_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            sheet_name: sheet_name.into(),
            row_index: None,
            column_name: None,
            severity: Severity::Critical,
            current_value: None,
            affects_multiple: false,
            suggested_fix: None,
        }
    }

    /// Cell-scoped error.
    pub fn cell(
        kind: ErrorKind,
        sheet_name: impl Into<String>,
        row_index: usize,
        column_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            row_index: Some(row_index),
            column_name: Some(column_name.into()),
            ..Self::sheet(kind, sheet_name, message)
        }
    }

    /// Set the severity.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Record the raw offending value.
    pub fn with_current_value(mut self, value: Option<&Value>) -> Self {
        self.current_value = value.cloned();
        self
    }

    /// Mark the fix as applying to every row with the same raw value.
    pub fn affecting_multiple(mut self) -> Self {
        self.affects_multiple = true;
        self
    }

    /// Attach a suggested fix.
    pub fn with_fix(mut self, fix: SuggestedFix) -> Self {
        self.suggested_fix = Some(fix);
        self
    }

    /// Whether the error is critical.
    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }

    /// Short location string such as `tasks[3].Duration` or `tasks`.
    pub fn location(&self) -> String {
        match (self.row_index, &self.column_name) {
            (Some(row), Some(column)) => format!("{}[{}].{}", self.sheet_name, row, column),
            (Some(row), None) => format!("{}[{}]", self.sheet_name, row),
            _ => self.sheet_name.clone(),
        }
    }
}
