//! Fix suggestions synthesized from validation errors.

mod generator;
mod suggestion;

pub use generator::{SuggestionEngine, DEFAULT_MAX_SUGGESTIONS};
pub use suggestion::{FixSuggestion, RULE_ENGINE};
