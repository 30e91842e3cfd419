//! Extraction strategies
//!
//! Each strategy reads the normalized text and its structure and returns a
//! partial profile. The engine merges partial profiles in list order, so
//! earlier strategies win ties.

mod contextual;
mod key_value;
mod pattern;
mod section;
mod template;

pub use contextual::{detect_category, ClientCategory, ContextualStrategy};
pub use key_value::KeyValueStrategy;
pub use pattern::{PatternRule, PatternStrategy, PATTERN_RULES};
pub use section::SectionStrategy;
pub use template::{Template, TemplateStrategy, TEMPLATES};

use crate::config::ParserConfig;
use crate::error::ExtractorError;
use crate::fuzzy::FieldMatcher;
use dossier_domain::{ClientProfile, DocumentStructure};

/// One independent extraction pass
///
/// Implementations must be deterministic for a given input. Errors are
/// reported to the engine, which records a warning and carries on with an
/// empty contribution.
pub trait ExtractionStrategy: Send + Sync {
    /// Short name used in warnings and parse metadata
    fn name(&self) -> &'static str;

    /// Extract a partial profile
    fn run(&self, text: &str, structure: &DocumentStructure)
        -> Result<ClientProfile, ExtractorError>;
}

/// The five built-in strategies in merge order
pub fn default_strategies(
    config: &ParserConfig,
    matcher: &FieldMatcher,
) -> Vec<Box<dyn ExtractionStrategy>> {
    vec![
        Box::new(PatternStrategy),
        Box::new(SectionStrategy::new(matcher.clone())),
        Box::new(KeyValueStrategy::new(matcher.clone())),
        Box::new(ContextualStrategy),
        Box::new(TemplateStrategy::new(config.template_match_ratio)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use dossier_domain::NoopLearner;
    use std::sync::Arc;

    #[test]
    fn test_default_order() {
        let config = ParserConfig::default();
        let matcher = FieldMatcher::new(Vec::new(), 0.7, true, Arc::new(NoopLearner));
        let names: Vec<&str> = default_strategies(&config, &matcher)
            .iter()
            .map(|s| s.name())
            .collect();
        assert_eq!(names, vec!["pattern", "section", "key_value", "contextual", "template"]);
    }
}
