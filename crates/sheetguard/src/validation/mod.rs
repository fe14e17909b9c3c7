//! Validation engine for schema and cross-sheet consistency rules.

pub mod cross_sheet;
mod engine;
pub mod identity;
mod issue;
pub mod structural;

pub use cross_sheet::{
    validate_max_concurrency, validate_phase_windows, validate_skill_coverage,
    validate_task_references, validate_worker_overload,
};
pub use engine::{
    DuplicateIdValidator, FieldTypeValidator, JsonFieldValidator, MaxConcurrencyValidator,
    NumberRangeValidator, PhaseWindowValidator, SheetContext, SheetErrors, SkillCoverageValidator,
    StructureValidator, TaskReferenceValidator, ValidationEngine, Validator,
    WorkerOverloadValidator,
};
pub use identity::check_duplicate_ids;
pub use issue::{ErrorKind, Severity, SuggestedFix, ValidationError};
pub use structural::{
    validate_entity_structure, validate_field_types, validate_json_field, validate_number_range,
    validate_required_columns,
};
