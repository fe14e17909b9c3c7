//! Schema registry for the recognised entity types.
//!
//! The set of entity types is closed, so each definition is a static table
//! of required columns and field rules.

mod entity;
mod rules;

pub use entity::{column_placeholder, EntityDefinition, EntityType, FieldRule, NumberRange};
pub use rules::{parse_range, FieldKind, DEFAULT_PRIORITY, MAX_PHASE_SPAN};
