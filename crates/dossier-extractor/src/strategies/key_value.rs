//! Line-by-line `label: value` extraction

use super::ExtractionStrategy;
use crate::error::ExtractorError;
use crate::fuzzy::FieldMatcher;
use crate::values::{apply_labeled_lines, labeled_lines};
use dossier_domain::{ClientProfile, DocumentStructure};
use tracing::trace;

/// Fuzzy-maps every label in the document to a profile field
///
/// Labels that map to no field are dropped. Successful mappings are
/// recorded with the matcher's learner.
#[derive(Debug, Clone)]
pub struct KeyValueStrategy {
    matcher: FieldMatcher,
}

impl KeyValueStrategy {
    /// Create a key-value strategy over `matcher`
    pub fn new(matcher: FieldMatcher) -> Self {
        Self { matcher }
    }
}

impl ExtractionStrategy for KeyValueStrategy {
    fn name(&self) -> &'static str {
        "key_value"
    }

    fn run(
        &self,
        text: &str,
        _structure: &DocumentStructure,
    ) -> Result<ClientProfile, ExtractorError> {
        let entries = labeled_lines(text);
        let mut profile = ClientProfile::new();
        let added = apply_labeled_lines(&mut profile, &entries, &self.matcher, true);
        trace!("Key-value pass: {} labels, {} values", entries.len(), added);
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dossier_domain::{NoopLearner, PatternLearner, ProfileField};
    use dossier_store::LearningStore;
    use std::sync::Arc;

    fn strategy(learner: Arc<dyn PatternLearner>) -> KeyValueStrategy {
        KeyValueStrategy::new(FieldMatcher::new(Vec::new(), 0.7, true, learner))
    }

    #[test]
    fn test_minimal_brief() {
        let text = "Client: Acme Corp\nIndustry: Software\nCompetitors: Foo, Bar";
        let profile = strategy(Arc::new(NoopLearner))
            .run(text, &DocumentStructure::default())
            .unwrap();
        assert_eq!(profile.client_name, "Acme Corp");
        assert_eq!(profile.industry, "Software");
        assert_eq!(profile.competitor_names(), vec!["Foo", "Bar"]);
    }

    #[test]
    fn test_fuzzy_labels_and_bullets() {
        let text = "Competiters:\n- Foo\n- Bar\nGames: Space Quest; Star Raid\nWeather: sunny\nTier 1: IGN";
        let profile = strategy(Arc::new(NoopLearner))
            .run(text, &DocumentStructure::default())
            .unwrap();
        assert_eq!(profile.competitor_names(), vec!["Foo", "Bar"]);
        assert_eq!(profile.products, vec!["Space Quest", "Star Raid"]);
        assert_eq!(profile.sources.tier1, vec!["IGN"]);
        assert_eq!(profile.populated_fields(), 3);
    }

    #[test]
    fn test_first_scalar_wins() {
        let text = "Client: Acme\nCompany: Globex";
        let profile = strategy(Arc::new(NoopLearner))
            .run(text, &DocumentStructure::default())
            .unwrap();
        assert_eq!(profile.client_name, "Acme");
    }

    #[test]
    fn test_executives_and_contacts() {
        let text = "Executives: Jane Doe (CEO); John Roe, CFO\nContact: Pat Lee <pat@acme.com>";
        let profile = strategy(Arc::new(NoopLearner))
            .run(text, &DocumentStructure::default())
            .unwrap();
        assert_eq!(profile.executives.len(), 2);
        assert_eq!(profile.executives[1].role, "CFO");
        assert_eq!(profile.contacts[0].email, "pat@acme.com");
    }

    #[test]
    fn test_records_learned_labels() {
        let store = Arc::new(LearningStore::new());
        strategy(store.clone())
            .run("Rivals: Foo\nWeather: sunny", &DocumentStructure::default())
            .unwrap();
        assert_eq!(store.label_weight(ProfileField::Competitors, "Rivals"), 1);
        assert_eq!(store.len(), 1);
    }
}
