//! Section-based extraction

use super::ExtractionStrategy;
use crate::error::ExtractorError;
use crate::fuzzy::FieldMatcher;
use crate::preprocess::BULLET;
use crate::values::{assign_field, split_label, tier_from_label, LabeledLine};
use dossier_domain::{
    ClientProfile, Contact, DocumentStructure, ProfileField, Section, SectionType,
};
use tracing::trace;

/// Runs a type-specific extractor over every classified section
#[derive(Debug, Clone)]
pub struct SectionStrategy {
    matcher: FieldMatcher,
}

impl SectionStrategy {
    /// Create a section strategy that maps headers with `matcher`
    pub fn new(matcher: FieldMatcher) -> Self {
        Self { matcher }
    }

    /// Field a section feeds: its header's field if the header maps to
    /// one, otherwise the field of its classified type
    fn target_field(&self, section: &Section) -> Option<ProfileField> {
        if let Some(header) = section.header.as_deref() {
            if tier_from_label(header).is_some() {
                return Some(ProfileField::Sources);
            }
            if let Some((field, _)) = self.matcher.match_label(header) {
                return Some(field);
            }
        }
        field_for_type(section.section_type)
    }

    fn label_field(&self, label: &str) -> Option<ProfileField> {
        if tier_from_label(label).is_some() {
            return Some(ProfileField::Sources);
        }
        self.matcher.match_label(label).map(|(field, _)| field)
    }

    fn extract(&self, section: &Section, profile: &mut ClientProfile) {
        let Some(target) = self.target_field(section) else {
            return;
        };
        trace!(
            "Section {}..{} ({}) feeds {}",
            section.start_offset,
            section.end_offset,
            section.section_type.as_str(),
            target
        );

        // Labeled lines found by the analyzer
        for (label, value) in &section.metadata {
            if self.label_field(label) != Some(target) {
                continue;
            }
            let entry = LabeledLine {
                label: label.clone(),
                value: value.clone(),
                items: Vec::new(),
            };
            assign_field(profile, target, label, &entry);
        }

        // Free lines count only under a header that says what they are
        if let Some(header) = section.header.as_deref() {
            let items: Vec<String> = section
                .body()
                .lines()
                .filter(|line| {
                    !line.trim().is_empty()
                        && split_label(line).is_none_or(|(label, _)| self.label_field(&label).is_none())
                })
                .map(|line| line.strip_prefix(BULLET).unwrap_or(line).trim().to_string())
                .collect();
            if !items.is_empty() {
                let entry = LabeledLine {
                    label: header.to_string(),
                    value: String::new(),
                    items,
                };
                assign_field(profile, target, header, &entry);
            }
        }

        match target {
            ProfileField::Briefing if profile.briefing.schedule.is_empty() => {
                if let Some(time) = section.entities.times.first() {
                    profile.briefing.schedule = time.clone();
                }
            }
            ProfileField::Contacts => {
                for email in &section.entities.emails {
                    if !profile.contacts.iter().any(|c| &c.email == email) {
                        profile.add_contact(Contact {
                            email: email.clone(),
                            ..Contact::default()
                        });
                    }
                }
            }
            _ => {}
        }
    }
}

/// Field fed by a section type with no usable header
fn field_for_type(section_type: SectionType) -> Option<ProfileField> {
    match section_type {
        SectionType::Client => Some(ProfileField::ClientName),
        SectionType::Industry => Some(ProfileField::Industry),
        SectionType::Competitor => Some(ProfileField::Competitors),
        SectionType::Source => Some(ProfileField::Sources),
        SectionType::Exclude => Some(ProfileField::ExcludedTopics),
        SectionType::Schedule => Some(ProfileField::Briefing),
        SectionType::Description | SectionType::Unknown => None,
    }
}

impl ExtractionStrategy for SectionStrategy {
    fn name(&self) -> &'static str {
        "section"
    }

    fn run(
        &self,
        _text: &str,
        structure: &DocumentStructure,
    ) -> Result<ClientProfile, ExtractorError> {
        let mut profile = ClientProfile::new();
        for section in &structure.sections {
            self.extract(section, &mut profile);
        }
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::StructureAnalyzer;
    use dossier_domain::NoopLearner;
    use std::sync::Arc;

    fn run(text: &str) -> ClientProfile {
        let matcher = FieldMatcher::new(Vec::new(), 0.7, true, Arc::new(NoopLearner));
        let structure = StructureAnalyzer::default().analyze(text);
        SectionStrategy::new(matcher).run(text, &structure).unwrap()
    }

    #[test]
    fn test_header_lists() {
        let profile = run(
            "Key Competitors:\n- Foo Games (high priority)\n- Bar Studios\n\nTopics to Avoid:\n- Layoffs\n- Lawsuits",
        );
        assert_eq!(profile.competitor_names(), vec!["Foo Games", "Bar Studios"]);
        assert_eq!(profile.excluded_topics, vec!["Layoffs", "Lawsuits"]);
    }

    #[test]
    fn test_tiered_sources() {
        let profile = run("Media Sources\nTier 1: IGN, GameSpot\nTier 2: PC Gamer\n- Kotaku");
        assert_eq!(profile.sources.tier1, vec!["IGN", "GameSpot"]);
        assert_eq!(profile.sources.tier2, vec!["PC Gamer", "Kotaku"]);
    }

    #[test]
    fn test_tier_header() {
        let profile = run("Hand Search:\n- Gamasutra forums\n- ResetEra threads");
        assert_eq!(profile.sources.hand_search, vec!["Gamasutra forums", "ResetEra threads"]);
    }

    #[test]
    fn test_free_text_needs_header() {
        let profile = run("Industry\nInteractive entertainment and publishing");
        assert_eq!(profile.industry, "Interactive entertainment and publishing");

        // classified as industry, but nothing says which line is the value
        let profile = run("The industry is changing quickly and the market is crowded.");
        assert!(profile.industry.is_empty());
    }

    #[test]
    fn test_schedule_section() {
        let profile = run("Delivery Schedule:\nDaily briefing at 7:00 AM EST\nAudience: Comms team");
        assert_eq!(profile.briefing.audience, "Comms team");
        assert!(!profile.briefing.schedule.is_empty());
    }

    #[test]
    fn test_description_is_skipped() {
        let profile = run("About the account manager and their background in general terms.");
        assert!(profile.is_empty());
    }
}
