//! Entity types and their static definitions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::rules::{FieldKind, DEFAULT_PRIORITY};

/// One of the recognised sheet schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Clients,
    Workers,
    Tasks,
}

impl EntityType {
    /// All entity types in registry order.
    pub const ALL: [EntityType; 3] = [EntityType::Clients, EntityType::Workers, EntityType::Tasks];

    /// Entity type for a sheet name, `None` for unrecognised sheets.
    pub fn from_sheet_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "clients" => Some(EntityType::Clients),
            "workers" => Some(EntityType::Workers),
            "tasks" => Some(EntityType::Tasks),
            _ => None,
        }
    }

    /// Registry key (also the canonical sheet name).
    pub fn key(&self) -> &'static str {
        match self {
            EntityType::Clients => "clients",
            EntityType::Workers => "workers",
            EntityType::Tasks => "tasks",
        }
    }

    /// Static definition for this entity type.
    pub fn definition(&self) -> &'static EntityDefinition {
        match self {
            EntityType::Clients => &CLIENTS,
            EntityType::Workers => &WORKERS,
            EntityType::Tasks => &TASKS,
        }
    }
}

/// A field bound to the kind its values must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub field: &'static str,
    pub kind: FieldKind,
}

impl FieldRule {
    const fn new(field: &'static str, kind: FieldKind) -> Self {
        Self { field, kind }
    }
}

/// Inclusive numeric bounds checked for a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberRange {
    pub field: &'static str,
    pub min: f64,
    pub max: f64,
}

/// Schema of one entity type.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityDefinition {
    /// Which entity this definition describes.
    pub entity: EntityType,
    /// Columns every sheet of this type must carry.
    pub required_fields: &'static [&'static str],
    /// Column holding the entity identifier.
    pub id_field: &'static str,
    /// Per-field predicates and formatters.
    pub field_rules: &'static [FieldRule],
    /// Numeric bounds checked by the range validator.
    pub number_ranges: &'static [NumberRange],
    /// Columns expected to hold embedded JSON documents.
    pub json_fields: &'static [&'static str],
}

impl EntityDefinition {
    /// Rule for a field, if the field has one.
    pub fn rule(&self, field: &str) -> Option<&FieldRule> {
        self.field_rules.iter().find(|rule| rule.field == field)
    }

    /// Whether `field` is a required column.
    pub fn is_required(&self, field: &str) -> bool {
        self.required_fields.iter().any(|f| *f == field)
    }
}

/// Default value for a column that has to be created.
///
/// Priorities default to the middle level, identifier-like columns get a
/// `NEW_<field>` placeholder, everything else starts empty.
pub fn column_placeholder(field: &str) -> Value {
    if field == "PriorityLevel" {
        Value::from(DEFAULT_PRIORITY as i64)
    } else if field.contains("ID") {
        Value::String(format!("NEW_{}", field))
    } else {
        Value::String(String::new())
    }
}

static CLIENTS: EntityDefinition = EntityDefinition {
    entity: EntityType::Clients,
    required_fields: &["ClientID", "ClientName", "PriorityLevel"],
    id_field: "ClientID",
    field_rules: &[
        FieldRule::new("ClientID", FieldKind::Identifier),
        FieldRule::new("PriorityLevel", FieldKind::Priority),
        FieldRule::new("RequestedTaskIDs", FieldKind::TokenList { required: false }),
        FieldRule::new("AttributesJSON", FieldKind::Json),
    ],
    number_ranges: &[NumberRange {
        field: "PriorityLevel",
        min: 1.0,
        max: 5.0,
    }],
    json_fields: &["AttributesJSON"],
};

static WORKERS: EntityDefinition = EntityDefinition {
    entity: EntityType::Workers,
    required_fields: &["WorkerID", "WorkerName", "AvailableSlots", "MaxLoadPerPhase"],
    id_field: "WorkerID",
    field_rules: &[
        FieldRule::new("WorkerID", FieldKind::Identifier),
        FieldRule::new("AvailableSlots", FieldKind::IntegerArray),
        FieldRule::new("MaxLoadPerPhase", FieldKind::PositiveInteger),
        FieldRule::new("Skills", FieldKind::TokenList { required: false }),
    ],
    number_ranges: &[],
    json_fields: &[],
};

static TASKS: EntityDefinition = EntityDefinition {
    entity: EntityType::Tasks,
    required_fields: &["TaskID", "TaskName", "Duration", "RequiredSkills"],
    id_field: "TaskID",
    field_rules: &[
        FieldRule::new("TaskID", FieldKind::Identifier),
        FieldRule::new("Duration", FieldKind::AtLeastOne),
        FieldRule::new("RequiredSkills", FieldKind::TokenList { required: true }),
        FieldRule::new("PreferredPhases", FieldKind::PhaseWindow),
        FieldRule::new("MaxConcurrent", FieldKind::PositiveInteger),
    ],
    number_ranges: &[],
    json_fields: &[],
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sheet_name_recognition() {
        assert_eq!(EntityType::from_sheet_name("clients"), Some(EntityType::Clients));
        assert_eq!(EntityType::from_sheet_name(" Workers "), Some(EntityType::Workers));
        assert_eq!(EntityType::from_sheet_name("TASKS"), Some(EntityType::Tasks));
        assert_eq!(EntityType::from_sheet_name("notes"), None);
    }

    #[test]
    fn test_required_fields() {
        assert_eq!(
            EntityType::Clients.definition().required_fields,
            &["ClientID", "ClientName", "PriorityLevel"]
        );
        assert_eq!(
            EntityType::Workers.definition().required_fields,
            &["WorkerID", "WorkerName", "AvailableSlots", "MaxLoadPerPhase"]
        );
        assert_eq!(
            EntityType::Tasks.definition().required_fields,
            &["TaskID", "TaskName", "Duration", "RequiredSkills"]
        );
    }

    #[test]
    fn test_definitions_are_self_consistent() {
        for entity in EntityType::ALL {
            let def = entity.definition();
            assert_eq!(def.entity, entity);
            assert_eq!(EntityType::from_sheet_name(entity.key()), Some(entity));
            assert!(def.is_required(def.id_field));
            assert_eq!(def.rule(def.id_field).map(|r| r.kind), Some(FieldKind::Identifier));
        }
    }

    #[test]
    fn test_column_placeholders() {
        assert_eq!(column_placeholder("PriorityLevel"), json!(3));
        assert_eq!(column_placeholder("ClientID"), json!("NEW_ClientID"));
        assert_eq!(column_placeholder("ClientName"), json!(""));
    }
}
