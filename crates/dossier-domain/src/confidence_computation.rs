//! Confidence computation module
//!
//! Implements the deterministic field-presence formula. Per-field scores are
//! a fixed function of field content, never of which strategy produced the
//! value; the overall score is their weighted average.

use crate::{ClientProfile, Confidence, ProfileField};

/// Score awarded when a client name is present
pub const CLIENT_NAME_SCORE: f64 = 1.0;
/// Score awarded when an industry is present
pub const INDUSTRY_SCORE: f64 = 0.8;
/// Score awarded when at least one competitor is present
pub const COMPETITORS_SCORE: f64 = 0.9;
/// Score awarded when any source tier is non-empty
pub const SOURCES_SCORE: f64 = 0.8;
/// Score awarded when excluded topics are present
pub const EXCLUDED_TOPICS_SCORE: f64 = 0.7;

/// Weights and presence scores for confidence computation
#[derive(Debug, Clone)]
pub struct ConfidenceConfig {
    /// (field, weight, score-when-present) for every scored field
    pub fields: Vec<(ProfileField, f64, f64)>,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            fields: vec![
                (ProfileField::ClientName, 0.3, CLIENT_NAME_SCORE),
                (ProfileField::Industry, 0.2, INDUSTRY_SCORE),
                (ProfileField::Competitors, 0.2, COMPETITORS_SCORE),
                (ProfileField::Sources, 0.2, SOURCES_SCORE),
                (ProfileField::ExcludedTopics, 0.1, EXCLUDED_TOPICS_SCORE),
            ],
        }
    }
}

impl ConfidenceConfig {
    /// Sum of all field weights
    pub fn total_weight(&self) -> f64 {
        self.fields.iter().map(|(_, weight, _)| weight).sum()
    }
}

/// Score a single field: its presence score if populated, else 0
pub fn field_score(profile: &ClientProfile, field: ProfileField, present_score: f64) -> f64 {
    if profile.is_populated(field) {
        present_score.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Compute per-field and overall confidence for a profile
///
/// # Examples
///
/// ```
/// use dossier_domain::{ClientProfile, confidence_computation::{compute_confidence, ConfidenceConfig}};
///
/// let mut profile = ClientProfile::new();
/// profile.client_name = "Acme Corp".to_string();
///
/// let confidence = compute_confidence(&profile, &ConfidenceConfig::default());
/// assert!((confidence.overall - 0.3).abs() < 1e-9);
/// ```
pub fn compute_confidence(profile: &ClientProfile, config: &ConfidenceConfig) -> Confidence {
    let mut confidence = Confidence::zero();
    let total_weight = config.total_weight();

    let mut weighted = 0.0;
    for (field, weight, present_score) in &config.fields {
        let score = field_score(profile, *field, *present_score);
        confidence.per_field.insert(*field, score);
        weighted += weight * score;
    }

    confidence.overall = if total_weight > 0.0 {
        (weighted / total_weight).clamp(0.0, 1.0)
    } else {
        0.0
    };

    confidence
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::{Competitor, CompetitorKind, Priority, SourceTier};
    use proptest::prelude::*;

    fn profile_from_flags(flags: [bool; 5]) -> ClientProfile {
        let mut profile = ClientProfile::new();
        if flags[0] {
            profile.client_name = "Acme".to_string();
        }
        if flags[1] {
            profile.industry = "Retail".to_string();
        }
        if flags[2] {
            profile.add_competitor(Competitor::new("Foo", CompetitorKind::Direct, Priority::Medium));
        }
        if flags[3] {
            profile.sources.push(SourceTier::HandSearch, "Forum");
        }
        if flags[4] {
            profile.add_excluded_topic("Politics");
        }
        profile
    }

    proptest! {
        /// Property: overall confidence is always in [0, 1]
        #[test]
        fn test_confidence_range(flags in any::<[bool; 5]>()) {
            let confidence = compute_confidence(&profile_from_flags(flags), &ConfidenceConfig::default());
            prop_assert!(confidence.overall >= 0.0 && confidence.overall <= 1.0);
            for score in confidence.per_field.values() {
                prop_assert!(*score >= 0.0 && *score <= 1.0);
            }
        }

        /// Property: overall is zero exactly when every weighted field is empty
        #[test]
        fn test_zero_iff_empty(flags in any::<[bool; 5]>()) {
            let confidence = compute_confidence(&profile_from_flags(flags), &ConfidenceConfig::default());
            let any_populated = flags.iter().any(|f| *f);
            prop_assert_eq!(confidence.overall == 0.0, !any_populated);
        }

        /// Property: populating another field never lowers confidence
        #[test]
        fn test_monotonic_in_fields(flags in any::<[bool; 5]>(), extra in 0usize..5) {
            let mut more = flags;
            more[extra] = true;
            let config = ConfidenceConfig::default();
            let before = compute_confidence(&profile_from_flags(flags), &config);
            let after = compute_confidence(&profile_from_flags(more), &config);
            prop_assert!(after.overall >= before.overall);
        }
    }
}
