//! Main Sheetguard struct and public API.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::enrich::{run_enrichers, SuggestionEnricher};
use crate::error::{Result, SheetguardError};
use crate::input::Dataset;
use crate::suggestion::{FixSuggestion, SuggestionEngine, DEFAULT_MAX_SUGGESTIONS};
use crate::validation::{Severity, SheetErrors, ValidationEngine, ValidationError};

/// Number of issues kept as samples per sheet.
const SAMPLE_ISSUES: usize = 5;

/// Configuration for a validation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetguardConfig {
    /// Maximum rule-based suggestions kept in a report.
    pub max_suggestions: usize,
    /// Score points deducted per error.
    pub error_penalty: u32,
    /// Whether to run checks that read other sheets.
    pub cross_sheet: bool,
}

impl Default for SheetguardConfig {
    fn default() -> Self {
        Self {
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            error_penalty: 2,
            cross_sheet: true,
        }
    }
}

impl SheetguardConfig {
    /// Load a configuration from a JSON file. Missing keys take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| SheetguardError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&contents)
            .map_err(|e| SheetguardError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Set the maximum number of suggestions.
    pub fn with_max_suggestions(mut self, max: usize) -> Self {
        self.max_suggestions = max;
        self
    }

    /// Set the per-error score penalty.
    pub fn with_error_penalty(mut self, penalty: u32) -> Self {
        self.error_penalty = penalty;
        self
    }

    /// Enable or disable cross-sheet checks.
    pub fn with_cross_sheet(mut self, enabled: bool) -> Self {
        self.cross_sheet = enabled;
        self
    }
}

/// Identity of the snapshot a report was computed against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotInfo {
    /// Digest of the dataset contents.
    pub fingerprint: String,
    /// Sheet names in dataset order.
    pub sheets: Vec<String>,
    /// Rows across all sheets.
    pub total_rows: usize,
}

impl SnapshotInfo {
    /// Describe a dataset.
    pub fn of(dataset: &Dataset) -> Self {
        Self {
            fingerprint: dataset.fingerprint(),
            sheets: dataset.sheet_names().into_iter().map(str::to_string).collect(),
            total_rows: dataset.total_rows(),
        }
    }
}

/// Per-sheet breakdown of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetAnalysis {
    /// Sheet name as keyed in the dataset.
    pub sheet_name: String,
    /// Errors of any severity.
    pub error_count: usize,
    /// Errors with critical severity.
    pub critical_count: usize,
    /// Distinct error kinds, in first-seen order.
    pub error_types: Vec<String>,
    /// First few errors of the sheet.
    pub sample_issues: Vec<ValidationError>,
}

impl SheetAnalysis {
    fn of(sheet_name: &str, errors: &[ValidationError]) -> Self {
        let mut error_types: Vec<String> = Vec::new();
        for error in errors {
            let kind = error.kind.as_str();
            if !error_types.iter().any(|t| t == kind) {
                error_types.push(kind.to_string());
            }
        }

        Self {
            sheet_name: sheet_name.to_string(),
            error_count: errors.len(),
            critical_count: errors.iter().filter(|e| e.is_critical()).count(),
            error_types,
            sample_issues: errors.iter().take(SAMPLE_ISSUES).cloned().collect(),
        }
    }
}

/// Totals of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    /// Errors across all sheets.
    pub total_errors: usize,
    /// Errors with critical severity.
    pub critical: usize,
    /// Errors with warning severity.
    pub warning: usize,
    /// Error count per kind, in first-seen order.
    pub by_kind: IndexMap<String, usize>,
    /// One entry per sheet, in dataset order.
    pub sheets: Vec<SheetAnalysis>,
}

impl ReportSummary {
    fn of(errors: &SheetErrors) -> Self {
        let mut by_kind: IndexMap<String, usize> = IndexMap::new();
        let mut critical = 0;
        let mut warning = 0;

        for error in errors.values().flatten() {
            *by_kind.entry(error.kind.as_str().to_string()).or_insert(0) += 1;
            match error.severity {
                Severity::Critical => critical += 1,
                Severity::Warning => warning += 1,
            }
        }

        Self {
            total_errors: critical + warning,
            critical,
            warning,
            by_kind,
            sheets: errors
                .iter()
                .map(|(name, sheet_errors)| SheetAnalysis::of(name, sheet_errors))
                .collect(),
        }
    }
}

/// Result of validating a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// Snapshot the row indices below refer to.
    pub snapshot: SnapshotInfo,
    /// Errors per sheet.
    pub errors: SheetErrors,
    /// Rule-based suggestions followed by enricher suggestions.
    pub suggestions: Vec<FixSuggestion>,
    /// 0-100, lower with every error.
    pub data_quality_score: u32,
    /// Totals by severity, kind and sheet.
    pub summary: ReportSummary,
}

impl ValidationReport {
    /// Whether no errors were found.
    pub fn is_clean(&self) -> bool {
        self.summary.total_errors == 0
    }

    /// All errors, sheet by sheet.
    pub fn all_errors(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.values().flatten()
    }
}

/// Quality score for an error count: `max(0, 100 - penalty * errors)`.
pub fn quality_score(total_errors: usize, penalty: u32) -> u32 {
    let errors = u32::try_from(total_errors).unwrap_or(u32::MAX);
    100u32.saturating_sub(penalty.saturating_mul(errors))
}

/// The main Sheetguard validation engine.
pub struct Sheetguard {
    config: SheetguardConfig,
    validation: ValidationEngine,
    enrichers: Vec<Arc<dyn SuggestionEnricher>>,
}

impl Sheetguard {
    /// Create a new Sheetguard instance with default configuration.
    pub fn new() -> Self {
        Self::with_config(SheetguardConfig::default())
    }

    /// Create a Sheetguard instance with custom configuration.
    pub fn with_config(config: SheetguardConfig) -> Self {
        let validation = ValidationEngine::new().with_cross_sheet(config.cross_sheet);
        Self {
            config,
            validation,
            enrichers: Vec::new(),
        }
    }

    /// Add a suggestion enricher. Enrichers run in the order they are added.
    pub fn with_enricher(mut self, enricher: impl SuggestionEnricher + 'static) -> Self {
        self.enrichers.push(Arc::new(enricher));
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &SheetguardConfig {
        &self.config
    }

    /// Run every check and return the errors per sheet.
    pub fn validate_errors(&self, dataset: &Dataset) -> SheetErrors {
        self.validation.validate(dataset)
    }

    /// Validate a dataset and produce a full report.
    pub fn validate(&self, dataset: &Dataset) -> ValidationReport {
        let errors = self.validate_errors(dataset);

        let mut suggestions =
            SuggestionEngine::generate(dataset, &errors, self.config.max_suggestions);
        if !self.enrichers.is_empty() {
            let extra = run_enrichers(&self.enrichers, dataset, &errors);
            debug!(suggestions = extra.len(), "enricher suggestions appended");
            suggestions.extend(extra);
        }

        let summary = ReportSummary::of(&errors);
        let data_quality_score = quality_score(summary.total_errors, self.config.error_penalty);

        info!(
            sheets = dataset.len(),
            errors = summary.total_errors,
            suggestions = suggestions.len(),
            score = data_quality_score,
            "validation finished"
        );

        ValidationReport {
            snapshot: SnapshotInfo::of(dataset),
            errors,
            suggestions,
            data_quality_score,
            summary,
        }
    }
}

impl Default for Sheetguard {
    fn default() -> Self {
        Self::new()
    }
}
