//! Sheetguard: schema and cross-sheet validation for scheduling spreadsheets.
//!
//! Sheetguard checks a snapshot of in-memory sheets (clients, workers, tasks)
//! against a fixed schema registry, reports every failure with its exact row
//! and column, and proposes concrete fixes that can be applied in bulk.
//!
//! # Core Principles
//!
//! - **Deterministic**: the same snapshot always yields the same errors in
//!   the same order
//! - **Non-destructive**: fixes produce a new snapshot, the input is never
//!   modified
//! - **Findings are data**: malformed cells are reported, never raised
//!
//! # Example
//!
//! ```
//! use sheetguard::{Dataset, Sheetguard};
//!
//! let dataset = Dataset::from_json_str(
//!     r#"{"clients": [{"ClientID": "C1", "ClientName": "Acme", "PriorityLevel": 7}]}"#,
//! ).unwrap();
//!
//! let report = Sheetguard::new().validate(&dataset);
//!
//! assert_eq!(report.summary.total_errors, 2);
//! assert_eq!(report.data_quality_score, 96);
//! ```

pub mod enrich;
pub mod error;
pub mod input;
pub mod schema;
pub mod suggestion;
pub mod transform;
pub mod validation;

mod sheetguard;

pub use crate::sheetguard::{
    quality_score, ReportSummary, SheetAnalysis, Sheetguard, SheetguardConfig, SnapshotInfo,
    ValidationReport,
};
pub use enrich::{StaticEnricher, SuggestionEnricher};
pub use error::{Result, SheetguardError};
pub use input::{Dataset, Row, Sheet};
pub use schema::{EntityDefinition, EntityType, FieldKind};
pub use suggestion::{FixSuggestion, SuggestionEngine};
pub use transform::{apply_fixes, apply_fixes_to_rows, RowFix};
pub use validation::{ErrorKind, Severity, SheetErrors, SuggestedFix, ValidationEngine, ValidationError};
