//! Per-sheet validation pipelines.

use indexmap::IndexMap;
use tracing::debug;

use crate::input::{Dataset, Row, Sheet};
use crate::schema::{EntityDefinition, EntityType};

use super::cross_sheet::{
    validate_max_concurrency, validate_phase_windows, validate_skill_coverage,
    validate_task_references, validate_worker_overload,
};
use super::identity::check_duplicate_ids;
use super::issue::ValidationError;
use super::structural::{
    validate_entity_structure, validate_field_types, validate_json_field, validate_number_range,
};

/// Errors of one pass, keyed by sheet name in dataset order.
pub type SheetErrors = IndexMap<String, Vec<ValidationError>>;

/// A sheet under validation together with the dataset it belongs to.
pub struct SheetContext<'a> {
    /// Name of the sheet being validated.
    pub name: &'a str,
    /// The sheet being validated.
    pub sheet: &'a Sheet,
    /// Schema the sheet is validated against.
    pub definition: &'static EntityDefinition,
    /// The whole snapshot, for cross-sheet lookups.
    pub dataset: &'a Dataset,
}

impl<'a> SheetContext<'a> {
    /// Rows of the sheet being validated.
    pub fn rows(&self) -> &'a [Row] {
        &self.sheet.rows
    }

    /// Rows of the first sheet of another entity type, if the dataset has one.
    pub fn complement(&self, entity: EntityType) -> Option<&'a [Row]> {
        self.dataset
            .sheet_for(entity)
            .map(|(_, sheet)| sheet.rows.as_slice())
    }
}

/// Trait for validators.
pub trait Validator: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Whether the check reads another sheet.
    fn is_cross_sheet(&self) -> bool {
        false
    }

    /// Run validation and return errors in row order.
    fn validate(&self, ctx: &SheetContext<'_>) -> Vec<ValidationError>;
}

/// Required columns of the entity, with column creation fixes.
pub struct StructureValidator;

impl Validator for StructureValidator {
    fn name(&self) -> &'static str {
        "entity_structure"
    }

    fn validate(&self, ctx: &SheetContext<'_>) -> Vec<ValidationError> {
        validate_entity_structure(ctx.rows(), ctx.definition, ctx.name)
    }
}

/// Field predicates of the entity.
pub struct FieldTypeValidator;

impl Validator for FieldTypeValidator {
    fn name(&self) -> &'static str {
        "field_types"
    }

    fn validate(&self, ctx: &SheetContext<'_>) -> Vec<ValidationError> {
        validate_field_types(ctx.rows(), ctx.definition, ctx.name)
    }
}

/// Unique identifiers.
pub struct DuplicateIdValidator;

impl Validator for DuplicateIdValidator {
    fn name(&self) -> &'static str {
        "duplicate_ids"
    }

    fn validate(&self, ctx: &SheetContext<'_>) -> Vec<ValidationError> {
        check_duplicate_ids(ctx.rows(), ctx.definition.id_field, ctx.name)
    }
}

/// Numeric bounds from the registry, for columns the sheet carries.
pub struct NumberRangeValidator;

impl Validator for NumberRangeValidator {
    fn name(&self) -> &'static str {
        "number_ranges"
    }

    fn validate(&self, ctx: &SheetContext<'_>) -> Vec<ValidationError> {
        ctx.definition
            .number_ranges
            .iter()
            .filter(|range| ctx.sheet.has_column(range.field))
            .flat_map(|range| {
                validate_number_range(ctx.rows(), range.field, range.min, range.max, ctx.name)
            })
            .collect()
    }
}

/// Embedded JSON columns from the registry, for columns the sheet carries.
pub struct JsonFieldValidator;

impl Validator for JsonFieldValidator {
    fn name(&self) -> &'static str {
        "json_fields"
    }

    fn validate(&self, ctx: &SheetContext<'_>) -> Vec<ValidationError> {
        ctx.definition
            .json_fields
            .iter()
            .filter(|field| ctx.sheet.has_column(field))
            .flat_map(|field| validate_json_field(ctx.rows(), field, ctx.name))
            .collect()
    }
}

/// Worker slots against maximum load.
pub struct WorkerOverloadValidator;

impl Validator for WorkerOverloadValidator {
    fn name(&self) -> &'static str {
        "worker_overload"
    }

    fn validate(&self, ctx: &SheetContext<'_>) -> Vec<ValidationError> {
        validate_worker_overload(ctx.rows(), ctx.name)
    }
}

/// Preferred phase windows.
pub struct PhaseWindowValidator;

impl Validator for PhaseWindowValidator {
    fn name(&self) -> &'static str {
        "phase_windows"
    }

    fn validate(&self, ctx: &SheetContext<'_>) -> Vec<ValidationError> {
        validate_phase_windows(ctx.rows(), ctx.name)
    }
}

/// Client task requests against the tasks sheet.
pub struct TaskReferenceValidator;

impl Validator for TaskReferenceValidator {
    fn name(&self) -> &'static str {
        "task_references"
    }

    fn is_cross_sheet(&self) -> bool {
        true
    }

    fn validate(&self, ctx: &SheetContext<'_>) -> Vec<ValidationError> {
        let Some(tasks) = ctx.complement(EntityType::Tasks) else {
            return Vec::new();
        };
        validate_task_references(ctx.rows(), tasks, "RequestedTaskIDs", "TaskID", ctx.name)
    }
}

/// Task skills against the skills workers offer.
pub struct SkillCoverageValidator;

impl Validator for SkillCoverageValidator {
    fn name(&self) -> &'static str {
        "skill_coverage"
    }

    fn is_cross_sheet(&self) -> bool {
        true
    }

    fn validate(&self, ctx: &SheetContext<'_>) -> Vec<ValidationError> {
        let Some(workers) = ctx.complement(EntityType::Workers) else {
            return Vec::new();
        };
        validate_skill_coverage(ctx.rows(), workers, ctx.name)
    }
}

/// Task concurrency against qualified workers.
pub struct MaxConcurrencyValidator;

impl Validator for MaxConcurrencyValidator {
    fn name(&self) -> &'static str {
        "max_concurrency"
    }

    fn is_cross_sheet(&self) -> bool {
        true
    }

    fn validate(&self, ctx: &SheetContext<'_>) -> Vec<ValidationError> {
        let Some(workers) = ctx.complement(EntityType::Workers) else {
            return Vec::new();
        };
        validate_max_concurrency(ctx.rows(), workers, ctx.name)
    }
}

/// Runs the pipeline of each recognised sheet and collects errors.
///
/// Pipelines run structure, field types, identity, range/JSON and capacity
/// checks, then cross-sheet checks, always in that order.
pub struct ValidationEngine {
    clients: Vec<Box<dyn Validator>>,
    workers: Vec<Box<dyn Validator>>,
    tasks: Vec<Box<dyn Validator>>,
    cross_sheet: bool,
}

impl ValidationEngine {
    /// Create a validation engine with all default pipelines.
    pub fn new() -> Self {
        Self {
            clients: vec![
                Box::new(StructureValidator),
                Box::new(FieldTypeValidator),
                Box::new(DuplicateIdValidator),
                Box::new(NumberRangeValidator),
                Box::new(JsonFieldValidator),
                Box::new(TaskReferenceValidator),
            ],
            workers: vec![
                Box::new(StructureValidator),
                Box::new(FieldTypeValidator),
                Box::new(DuplicateIdValidator),
                Box::new(NumberRangeValidator),
                Box::new(JsonFieldValidator),
                Box::new(WorkerOverloadValidator),
            ],
            tasks: vec![
                Box::new(StructureValidator),
                Box::new(FieldTypeValidator),
                Box::new(DuplicateIdValidator),
                Box::new(NumberRangeValidator),
                Box::new(JsonFieldValidator),
                Box::new(PhaseWindowValidator),
                Box::new(SkillCoverageValidator),
                Box::new(MaxConcurrencyValidator),
            ],
            cross_sheet: true,
        }
    }

    /// Enable or disable checks that read other sheets.
    pub fn with_cross_sheet(mut self, enabled: bool) -> Self {
        self.cross_sheet = enabled;
        self
    }

    /// Validator pipeline for an entity type.
    pub fn pipeline(&self, entity: EntityType) -> &[Box<dyn Validator>] {
        match entity {
            EntityType::Clients => &self.clients,
            EntityType::Workers => &self.workers,
            EntityType::Tasks => &self.tasks,
        }
    }

    /// Validate every sheet of a dataset.
    ///
    /// Every sheet gets an entry, in dataset order; unrecognised sheets map to
    /// an empty list.
    pub fn validate(&self, dataset: &Dataset) -> SheetErrors {
        dataset
            .sheets()
            .map(|(name, sheet)| (name.to_string(), self.validate_sheet(dataset, name, sheet)))
            .collect()
    }

    /// Validate one sheet of a dataset.
    pub fn validate_sheet(&self, dataset: &Dataset, name: &str, sheet: &Sheet) -> Vec<ValidationError> {
        let Some(entity) = EntityType::from_sheet_name(name) else {
            debug!(sheet = name, "skipping unrecognised sheet");
            return Vec::new();
        };

        let ctx = SheetContext {
            name,
            sheet,
            definition: entity.definition(),
            dataset,
        };

        let mut errors = Vec::new();
        for validator in self.pipeline(entity) {
            if validator.is_cross_sheet() && !self.cross_sheet {
                continue;
            }
            let found = validator.validate(&ctx);
            debug!(
                sheet = name,
                validator = validator.name(),
                errors = found.len(),
                "validator finished"
            );
            errors.extend(found);
        }
        errors
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}
