//! Template matching against known note layouts

use super::ExtractionStrategy;
use crate::error::ExtractorError;
use crate::values::{assign_field, labeled_lines, tier_from_label};
use dossier_domain::{ClientProfile, DocumentStructure, ProfileField};
use tracing::debug;

/// A known document layout
#[derive(Debug)]
pub struct Template {
    /// Template name
    pub name: &'static str,
    /// Lower-case markers; the share present decides the match
    pub markers: &'static [&'static str],
    /// Exact lower-case labels this layout uses, and their fields
    pub labels: &'static [(&'static str, ProfileField)],
}

impl Template {
    /// Share of markers present in lower-cased text
    pub fn match_ratio(&self, lowered: &str) -> f64 {
        if self.markers.is_empty() {
            return 0.0;
        }
        let present = self.markers.iter().filter(|m| lowered.contains(*m)).count();
        present as f64 / self.markers.len() as f64
    }

    fn field_for(&self, label: &str) -> Option<ProfileField> {
        let lower = label.trim().to_lowercase();
        if let Some((_, field)) = self.labels.iter().find(|(l, _)| *l == lower) {
            return Some(*field);
        }
        let takes_sources = self.labels.iter().any(|(_, f)| *f == ProfileField::Sources);
        (takes_sources && tier_from_label(label).is_some()).then_some(ProfileField::Sources)
    }

    /// Run this layout's extractor: exact labels only, no fuzzy matching
    pub fn extract(&self, text: &str) -> ClientProfile {
        let mut profile = ClientProfile::new();
        for entry in labeled_lines(text) {
            if let Some(field) = self.field_for(&entry.label) {
                assign_field(&mut profile, field, &entry.label, &entry);
            }
        }
        profile
    }
}

/// Built-in layouts, in tie-break order
pub static TEMPLATES: &[Template] = &[
    Template {
        name: "media_brief",
        markers: &["client:", "industry:", "competitors:", "sources:", "exclude", "schedule"],
        labels: &[
            ("client", ProfileField::ClientName),
            ("client name", ProfileField::ClientName),
            ("industry", ProfileField::Industry),
            ("competitors", ProfileField::Competitors),
            ("sources", ProfileField::Sources),
            ("exclude", ProfileField::ExcludedTopics),
            ("excluded topics", ProfileField::ExcludedTopics),
            ("schedule", ProfileField::Briefing),
            ("audience", ProfileField::Briefing),
            ("length", ProfileField::Briefing),
        ],
    },
    Template {
        name: "gaming_client",
        markers: &["client:", "games:", "platforms", "competitors:", "tier 1"],
        labels: &[
            ("client", ProfileField::ClientName),
            ("studio", ProfileField::ClientName),
            ("publisher", ProfileField::ClientName),
            ("genre", ProfileField::Industry),
            ("industry", ProfileField::Industry),
            ("games", ProfileField::Products),
            ("titles", ProfileField::Products),
            ("franchises", ProfileField::Products),
            ("competitors", ProfileField::Competitors),
            ("rival studios", ProfileField::Competitors),
            ("avoid", ProfileField::ExcludedTopics),
        ],
    },
    Template {
        name: "executive_roster",
        markers: &["executives", "ceo", "spokesperson", "contact", "sentiment"],
        labels: &[
            ("client", ProfileField::ClientName),
            ("company", ProfileField::ClientName),
            ("executives", ProfileField::Executives),
            ("leadership", ProfileField::Executives),
            ("spokespeople", ProfileField::Executives),
            ("contact", ProfileField::Contacts),
            ("contacts", ProfileField::Contacts),
            ("press contact", ProfileField::Contacts),
        ],
    },
    Template {
        name: "media_monitoring",
        markers: &["tier 1", "tier 2", "tier 3", "hand search", "exclude"],
        labels: &[
            ("client", ProfileField::ClientName),
            ("monitoring for", ProfileField::ClientName),
            ("outlets", ProfileField::Sources),
            ("exclude", ProfileField::ExcludedTopics),
            ("do not cover", ProfileField::ExcludedTopics),
            ("delivery", ProfileField::Briefing),
            ("recipients", ProfileField::Briefing),
        ],
    },
];

/// Runs the best-matching template's extractor when it clears the ratio
#[derive(Debug, Clone)]
pub struct TemplateStrategy {
    min_ratio: f64,
}

impl TemplateStrategy {
    /// Create a template strategy with the given minimum marker ratio
    pub fn new(min_ratio: f64) -> Self {
        Self { min_ratio }
    }

    /// Best template for `text` and its ratio, if any clears the minimum
    ///
    /// Ties go to the template listed first.
    pub fn best_match(&self, text: &str) -> Option<(&'static Template, f64)> {
        let lowered = text.to_lowercase();
        let mut best: Option<(&'static Template, f64)> = None;
        for template in TEMPLATES {
            let ratio = template.match_ratio(&lowered);
            if ratio >= self.min_ratio && best.is_none_or(|(_, r)| ratio > r) {
                best = Some((template, ratio));
            }
        }
        best
    }
}

impl ExtractionStrategy for TemplateStrategy {
    fn name(&self) -> &'static str {
        "template"
    }

    fn run(
        &self,
        text: &str,
        _structure: &DocumentStructure,
    ) -> Result<ClientProfile, ExtractorError> {
        match self.best_match(text) {
            Some((template, ratio)) => {
                debug!("Template {} matched at {:.2}", template.name, ratio);
                Ok(template.extract(text))
            }
            None => Ok(ClientProfile::new()),
        }
    }
}
