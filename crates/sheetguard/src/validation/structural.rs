//! Column presence, field type, numeric range and embedded JSON checks.

use serde_json::Value;

use crate::input::value::{
    cell_to_number, cell_to_string, format_number, number_value, parse_json_cell, Blank,
};
use crate::input::Row;
use crate::schema::{column_placeholder, EntityDefinition};

use super::issue::{ErrorKind, SuggestedFix, ValidationError};

/// Flag each required field absent from the first row.
///
/// An empty sheet has no header to check and reports nothing.
pub fn validate_required_columns(
    rows: &[Row],
    required_fields: &[&str],
    sheet_name: &str,
) -> Vec<ValidationError> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };

    required_fields
        .iter()
        .filter(|field| !first.contains_key(**field))
        .map(|field| {
            ValidationError::sheet(
                ErrorKind::MissingColumn,
                sheet_name,
                format!("Missing required column: {}", field),
            )
        })
        .collect()
}

/// Flag required fields missing from the first row, with a column creation fix.
///
/// Unlike [`validate_required_columns`], an empty sheet reports every
/// required field.
pub fn validate_entity_structure(
    rows: &[Row],
    definition: &EntityDefinition,
    sheet_name: &str,
) -> Vec<ValidationError> {
    definition
        .required_fields
        .iter()
        .filter(|field| rows.first().is_none_or(|first| !first.contains_key(**field)))
        .map(|field| {
            ValidationError::sheet(
                ErrorKind::MissingColumn,
                sheet_name,
                format!("Required column '{}' is missing", field),
            )
            .with_fix(SuggestedFix::create_column(
                *field,
                column_placeholder(field),
                format!("Add missing required column '{}'", field),
            ))
        })
        .collect()
}

/// Check every present field that has a rule against its predicate.
pub fn validate_field_types(
    rows: &[Row],
    definition: &EntityDefinition,
    sheet_name: &str,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (row_index, row) in rows.iter().enumerate() {
        for rule in definition.field_rules {
            let Some(value) = row.get(rule.field) else {
                continue;
            };
            if rule.kind.check(Some(value)) {
                continue;
            }

            let mut error = ValidationError::cell(
                ErrorKind::InvalidFormat,
                sheet_name,
                row_index,
                rule.field,
                format!("Invalid format for {}: {}", rule.field, cell_to_string(Some(value))),
            )
            .with_current_value(Some(value))
            .affecting_multiple();

            if let Some(fixed) = rule.kind.format(Some(value)) {
                error = error.with_fix(SuggestedFix::new(
                    fixed,
                    format!("Format {} according to requirements", rule.field),
                ));
            }
            errors.push(error);
        }
    }

    errors
}

/// Check that a field is a number within `[min, max]`.
pub fn validate_number_range(
    rows: &[Row],
    field: &str,
    min: f64,
    max: f64,
    sheet_name: &str,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (row_index, row) in rows.iter().enumerate() {
        let value = row.get(field);
        let num = cell_to_number(value);

        if num.is_nan() {
            errors.push(
                ValidationError::cell(
                    ErrorKind::InvalidNumber,
                    sheet_name,
                    row_index,
                    field,
                    format!("{} must be a number, got {}", field, cell_to_string(value)),
                )
                .with_current_value(value),
            );
        } else if num < min || num > max {
            errors.push(
                ValidationError::cell(
                    ErrorKind::OutOfRange,
                    sheet_name,
                    row_index,
                    field,
                    format!(
                        "{} must be between {}-{}, got {}",
                        field,
                        format_number(min),
                        format_number(max),
                        cell_to_string(value)
                    ),
                )
                .with_current_value(value)
                .affecting_multiple()
                .with_fix(SuggestedFix::new(
                    number_value(num.clamp(min, max)),
                    "Adjusted to valid range",
                )),
            );
        }
    }

    errors
}

/// Check that a field parses as JSON. Absent and null cells do not.
pub fn validate_json_field(rows: &[Row], field: &str, sheet_name: &str) -> Vec<ValidationError> {
    rows.iter()
        .enumerate()
        .filter_map(|(row_index, row)| {
            let value = row.get(field);
            let reason = parse_json_cell(value, Blank::Empty).err()?;
            Some(
                ValidationError::cell(
                    ErrorKind::InvalidJson,
                    sheet_name,
                    row_index,
                    field,
                    format!("Invalid JSON in {}: {}", field, reason),
                )
                .with_current_value(value)
                .affecting_multiple()
                .with_fix(SuggestedFix::new(
                    Value::String("{}".to_string()),
                    "Reset to empty JSON object",
                )),
            )
        })
        .collect()
}
