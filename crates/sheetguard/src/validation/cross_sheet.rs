//! Referential integrity and capacity checks spanning sheets.

use std::collections::HashSet;

use serde_json::Value;

use crate::input::value::{
    cell_text, cell_to_number, cell_to_string, is_truthy, number_value, parse_json_cell, split_list,
    Blank,
};
use crate::input::Row;
use crate::schema::FieldKind;

use super::issue::{ErrorKind, SuggestedFix, ValidationError};

/// Flag comma-separated references in `source_field` that match no
/// `target_field` value in the target rows.
///
/// Does nothing when either side is empty.
pub fn validate_task_references(
    source_rows: &[Row],
    target_rows: &[Row],
    source_field: &str,
    target_field: &str,
    sheet_name: &str,
) -> Vec<ValidationError> {
    if source_rows.is_empty() || target_rows.is_empty() {
        return Vec::new();
    }

    let valid_targets: HashSet<String> = target_rows
        .iter()
        .map(|row| cell_text(row.get(target_field)))
        .collect();

    let mut errors = Vec::new();
    for (row_index, row) in source_rows.iter().enumerate() {
        for reference in split_list(row.get(source_field)) {
            if valid_targets.contains(&reference) {
                continue;
            }
            errors.push(
                ValidationError::cell(
                    ErrorKind::InvalidReference,
                    sheet_name,
                    row_index,
                    source_field,
                    format!("Referenced {} '{}' not found", target_field, reference),
                )
                .with_current_value(row.get(source_field)),
            );
        }
    }
    errors
}

/// Check that each worker has at least as many slots as its maximum load.
///
/// Missing slots count as an empty list and a missing load as one.
pub fn validate_worker_overload(workers: &[Row], sheet_name: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (row_index, worker) in workers.iter().enumerate() {
        let slots_cell = worker.get("AvailableSlots");
        let slots = match parse_json_cell(slots_cell, Blank::Literal("[]")) {
            Ok(Value::Array(slots)) => slots,
            Ok(_) => {
                errors.push(
                    ValidationError::cell(
                        ErrorKind::InvalidSlotsFormat,
                        sheet_name,
                        row_index,
                        "AvailableSlots",
                        "AvailableSlots must be an array",
                    )
                    .with_current_value(slots_cell),
                );
                continue;
            }
            Err(reason) => {
                errors.push(
                    ValidationError::cell(
                        ErrorKind::InvalidSlotsFormat,
                        sheet_name,
                        row_index,
                        "AvailableSlots",
                        format!("AvailableSlots must be valid JSON array: {}", reason),
                    )
                    .with_current_value(slots_cell),
                );
                continue;
            }
        };

        let load_cell = worker.get("MaxLoadPerPhase");
        let max_load = defaulted_number(load_cell, 1.0);
        let slot_count = slots.len() as f64;

        if slot_count < max_load {
            errors.push(
                ValidationError::cell(
                    ErrorKind::WorkerOverload,
                    sheet_name,
                    row_index,
                    "MaxLoadPerPhase",
                    format!(
                        "Worker only has {} slots but max load is {}",
                        slots.len(),
                        cell_to_string(load_cell.or(Some(&Value::from(1))))
                    ),
                )
                .with_current_value(load_cell)
                .with_fix(SuggestedFix::new(
                    number_value(max_load.min(slot_count)),
                    "Adjusted to available slots",
                )),
            );
        }
    }

    errors
}

/// Flag required skills that no worker lists.
///
/// One error per missing skill per task. Does nothing when either side is empty.
pub fn validate_skill_coverage(tasks: &[Row], workers: &[Row], sheet_name: &str) -> Vec<ValidationError> {
    if tasks.is_empty() || workers.is_empty() {
        return Vec::new();
    }

    let all_skills: HashSet<String> = workers
        .iter()
        .flat_map(|worker| split_list(worker.get("Skills")))
        .collect();

    let mut errors = Vec::new();
    for (row_index, task) in tasks.iter().enumerate() {
        for skill in split_list(task.get("RequiredSkills")) {
            if all_skills.contains(&skill) {
                continue;
            }
            errors.push(
                ValidationError::cell(
                    ErrorKind::MissingSkill,
                    sheet_name,
                    row_index,
                    "RequiredSkills",
                    format!("No worker has required skill: {}", skill),
                )
                .with_current_value(task.get("RequiredSkills")),
            );
        }
    }
    errors
}

/// Check that a filled-in PreferredPhases is a JSON array.
///
/// A blank or absent PreferredPhases is valid. A `"start-end"` range is not
/// JSON and is reported here; the fix is the field formatter's array.
pub fn validate_phase_windows(tasks: &[Row], sheet_name: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (row_index, task) in tasks.iter().enumerate() {
        let phases = task.get("PreferredPhases");
        if !is_truthy(phases) {
            continue;
        }

        let message = match parse_json_cell(phases, Blank::Verbatim) {
            Ok(Value::Array(_)) => continue,
            Ok(_) => "PreferredPhases must be a JSON array".to_string(),
            Err(reason) => format!("PreferredPhases must be valid JSON: {}", reason),
        };

        errors.push(
            ValidationError::cell(
                ErrorKind::InvalidPhaseFormat,
                sheet_name,
                row_index,
                "PreferredPhases",
                message,
            )
            .with_current_value(phases)
            .with_fix(SuggestedFix::new(
                FieldKind::PhaseWindow.format(phases).unwrap_or_else(|| Value::from("[1]")),
                "Converted to a JSON array of phases",
            )),
        );
    }

    errors
}

/// Check that enough workers hold every required skill of a task to run
/// `MaxConcurrent` copies of it at once.
///
/// A missing MaxConcurrent counts as one.
pub fn validate_max_concurrency(tasks: &[Row], workers: &[Row], sheet_name: &str) -> Vec<ValidationError> {
    let worker_skills: Vec<HashSet<String>> = workers
        .iter()
        .map(|worker| split_list(worker.get("Skills")).into_iter().collect())
        .collect();

    let mut errors = Vec::new();
    for (row_index, task) in tasks.iter().enumerate() {
        let required = split_list(task.get("RequiredSkills"));
        let qualified = worker_skills
            .iter()
            .filter(|skills| required.iter().all(|skill| skills.contains(skill)))
            .count();

        let concurrency_cell = task.get("MaxConcurrent");
        let max_concurrent = defaulted_number(concurrency_cell, 1.0);

        if (qualified as f64) < max_concurrent {
            errors.push(
                ValidationError::cell(
                    ErrorKind::InsufficientWorkers,
                    sheet_name,
                    row_index,
                    "MaxConcurrent",
                    format!(
                        "Only {} qualified workers for {} concurrent tasks",
                        qualified,
                        cell_to_string(concurrency_cell.or(Some(&Value::from(1))))
                    ),
                )
                .with_current_value(concurrency_cell)
                .with_fix(SuggestedFix::new(
                    number_value(max_concurrent.min(qualified as f64)),
                    "Adjusted to available workers",
                )),
            );
        }
    }

    errors
}

/// Numeric value of a cell, with absent and null cells taking `default`.
fn defaulted_number(value: Option<&Value>, default: f64) -> f64 {
    match value {
        None | Some(Value::Null) => default,
        present => cell_to_number(present),
    }
}
