//! Optional suggestion sources beyond the rule engine.
//!
//! An enricher sees the snapshot and the deterministic errors and may return
//! extra suggestions. Its output is appended after the rule-based
//! suggestions and never replaces them. A failing enricher is logged and
//! skipped; validation results do not depend on it.

mod provider;
mod static_enricher;

pub use provider::{run_enrichers, SuggestionEnricher};
pub use static_enricher::StaticEnricher;
