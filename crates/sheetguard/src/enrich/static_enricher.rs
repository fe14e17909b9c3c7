//! Enricher returning a fixed list of suggestions.

use crate::error::Result;
use crate::input::Dataset;
use crate::suggestion::FixSuggestion;
use crate::validation::SheetErrors;

use super::provider::SuggestionEnricher;

/// Returns the same suggestions for every dataset.
///
/// Useful for tests and for embedding suggestions computed elsewhere.
#[derive(Debug, Clone)]
pub struct StaticEnricher {
    name: String,
    suggestions: Vec<FixSuggestion>,
}

impl StaticEnricher {
    /// Create an enricher with a fixed set of suggestions.
    pub fn new(name: impl Into<String>, suggestions: Vec<FixSuggestion>) -> Self {
        Self {
            name: name.into(),
            suggestions,
        }
    }

    /// Suggestions that will be returned.
    pub fn suggestions(&self) -> &[FixSuggestion] {
        &self.suggestions
    }
}

impl SuggestionEnricher for StaticEnricher {
    fn name(&self) -> &str {
        &self.name
    }

    fn enrich(&self, _dataset: &Dataset, _errors: &SheetErrors) -> Result<Vec<FixSuggestion>> {
        Ok(self.suggestions.clone())
    }
}
