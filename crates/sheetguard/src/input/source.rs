//! Dataset, sheet and row types.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::{Result, SheetguardError};
use crate::schema::EntityType;

/// One row of a sheet: column name to cell value, in column order.
pub type Row = IndexMap<String, Value>;

/// A named table of rows.
///
/// A row's position is its identity for one validation pass only. Any insert
/// or delete produces a new snapshot whose indices must be revalidated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sheet {
    /// Rows in sheet order.
    pub rows: Vec<Row>,
}

impl Sheet {
    /// Create a sheet from rows.
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the sheet has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Union of column names across all rows, in first-seen order.
    pub fn columns(&self) -> Vec<String> {
        let mut seen: IndexMap<&str, ()> = IndexMap::new();
        for row in &self.rows {
            for key in row.keys() {
                seen.entry(key.as_str()).or_insert(());
            }
        }
        seen.keys().map(|k| k.to_string()).collect()
    }

    /// Whether any row carries the given column.
    pub fn has_column(&self, column: &str) -> bool {
        self.rows.iter().any(|row| row.contains_key(column))
    }

    /// Cell at a row and column; `None` when the row or cell is absent.
    pub fn cell(&self, row_index: usize, column: &str) -> Option<&Value> {
        self.rows.get(row_index).and_then(|row| row.get(column))
    }
}

/// A snapshot of every sheet supplied for one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    sheets: IndexMap<String, Sheet>,
}

impl Dataset {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet, builder style. A sheet with the same name is replaced in place.
    pub fn with_sheet(mut self, name: impl Into<String>, rows: Vec<Row>) -> Self {
        self.insert_sheet(name, rows);
        self
    }

    /// Add or replace a sheet.
    pub fn insert_sheet(&mut self, name: impl Into<String>, rows: Vec<Row>) {
        self.sheets.insert(name.into(), Sheet::new(rows));
    }

    /// Parse a dataset from JSON of the form `{"sheet": [{"col": value}, ...]}`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Build a dataset from an already parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(SheetguardError::InvalidDataset(
                "expected an object mapping sheet names to rows".to_string(),
            ));
        };

        let mut dataset = Self::new();
        for (name, rows) in map {
            let Value::Array(items) = rows else {
                return Err(SheetguardError::InvalidDataset(format!(
                    "sheet '{}' is not a list of rows",
                    name
                )));
            };

            let mut parsed = Vec::with_capacity(items.len());
            for (index, item) in items.into_iter().enumerate() {
                let Value::Object(cells) = item else {
                    return Err(SheetguardError::InvalidDataset(format!(
                        "row {} of sheet '{}' is not an object",
                        index, name
                    )));
                };
                parsed.push(cells.into_iter().collect::<Row>());
            }
            dataset.insert_sheet(name, parsed);
        }

        Ok(dataset)
    }

    /// Load a dataset from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| SheetguardError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&contents)
    }

    /// Write the dataset as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| SheetguardError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Sheet by exact name.
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.get(name)
    }

    /// Mutable sheet by exact name.
    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheets.get_mut(name)
    }

    /// First sheet recognised as the given entity type.
    pub fn sheet_for(&self, entity: EntityType) -> Option<(&str, &Sheet)> {
        self.sheets
            .iter()
            .find(|(name, _)| EntityType::from_sheet_name(name) == Some(entity))
            .map(|(name, sheet)| (name.as_str(), sheet))
    }

    /// Sheets in dataset order.
    pub fn sheets(&self) -> impl Iterator<Item = (&str, &Sheet)> {
        self.sheets.iter().map(|(name, sheet)| (name.as_str(), sheet))
    }

    /// Sheet names in dataset order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.keys().map(String::as_str).collect()
    }

    /// Number of sheets.
    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    /// Whether the dataset has no sheets.
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Total rows across all sheets.
    pub fn total_rows(&self) -> usize {
        self.sheets.values().map(Sheet::row_count).sum()
    }

    /// SHA-256 digest identifying this snapshot.
    ///
    /// Row indices in a report are only meaningful against the snapshot with
    /// the same fingerprint.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        // Serializing a map of strings and JSON values cannot fail.
        let canonical = serde_json::to_vec(self).unwrap_or_default();
        hasher.update(&canonical);
        format!("sha256:{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_from_json_preserves_order() {
        let dataset = Dataset::from_json_str(
            r#"{"workers": [{"WorkerID": "W1"}], "clients": [{"ClientID": "C1", "B": 1, "A": 2}]}"#,
        )
        .unwrap();

        assert_eq!(dataset.sheet_names(), vec!["workers", "clients"]);
        assert_eq!(
            dataset.sheet("clients").unwrap().columns(),
            vec!["ClientID", "B", "A"]
        );
    }

    #[test]
    fn test_from_json_rejects_wrong_shape() {
        assert!(matches!(
            Dataset::from_json_str("[1, 2]"),
            Err(SheetguardError::InvalidDataset(_))
        ));
        assert!(matches!(
            Dataset::from_json_str(r#"{"tasks": [1]}"#),
            Err(SheetguardError::InvalidDataset(_))
        ));
    }

    #[test]
    fn test_columns_union_across_sparse_rows() {
        let sheet = Sheet::new(vec![row(json!({"A": 1})), row(json!({"B": 2, "A": 3}))]);
        assert_eq!(sheet.columns(), vec!["A", "B"]);
        assert!(sheet.has_column("B"));
        assert_eq!(sheet.cell(1, "B"), Some(&json!(2)));
        assert_eq!(sheet.cell(5, "B"), None);
    }

    #[test]
    fn test_sheet_for_entity() {
        let dataset = Dataset::new()
            .with_sheet("notes", vec![])
            .with_sheet("Tasks", vec![row(json!({"TaskID": "T1"}))]);

        let (name, sheet) = dataset.sheet_for(EntityType::Tasks).unwrap();
        assert_eq!(name, "Tasks");
        assert_eq!(sheet.row_count(), 1);
        assert!(dataset.sheet_for(EntityType::Workers).is_none());
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = Dataset::new().with_sheet("clients", vec![row(json!({"ClientID": "C1"}))]);
        let b = Dataset::new().with_sheet("clients", vec![row(json!({"ClientID": "C2"}))]);

        assert!(a.fingerprint().starts_with("sha256:"));
        assert_eq!(a.fingerprint(), a.clone().fingerprint());
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
