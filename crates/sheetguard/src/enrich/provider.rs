//! Enricher trait and runner.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::Result;
use crate::input::Dataset;
use crate::suggestion::FixSuggestion;
use crate::validation::SheetErrors;

/// Source of additional fix suggestions.
///
/// Implementations must be thread-safe (Send + Sync) so a configured
/// [`Sheetguard`](crate::Sheetguard) can be shared.
pub trait SuggestionEnricher: Send + Sync {
    /// Name recorded as the suggester of every suggestion this enricher returns.
    fn name(&self) -> &str;

    /// Propose suggestions for the given errors.
    fn enrich(&self, dataset: &Dataset, errors: &SheetErrors) -> Result<Vec<FixSuggestion>>;
}

/// Run enrichers in order and collect their suggestions.
///
/// Suggestions without affected rows are dropped. Errors are logged and the
/// enricher is skipped.
pub fn run_enrichers(
    enrichers: &[Arc<dyn SuggestionEnricher>],
    dataset: &Dataset,
    errors: &SheetErrors,
) -> Vec<FixSuggestion> {
    let mut suggestions = Vec::new();

    for enricher in enrichers {
        match enricher.enrich(dataset, errors) {
            Ok(found) => {
                debug!(enricher = enricher.name(), suggestions = found.len(), "enricher finished");
                suggestions.extend(
                    found
                        .into_iter()
                        .filter(|s| !s.affected_rows.is_empty())
                        .map(|s| s.with_suggester(enricher.name())),
                );
            }
            Err(e) => {
                warn!(enricher = enricher.name(), error = %e, "enricher failed, skipping");
            }
        }
    }

    suggestions
}
