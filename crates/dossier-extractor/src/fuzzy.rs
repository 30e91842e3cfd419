//! Fuzzy label-to-field matching

use dossier_domain::{PatternLearner, ProfileField};
use std::sync::Arc;

/// Score for a label contained in (or containing) a synonym
pub const CONTAINMENT_SCORE: f64 = 0.8;

/// Shorter strings than this never count as contained
pub const MIN_CONTAINMENT_CHARS: usize = 3;

/// Built-in label synonyms per field, lower-case
pub const FIELD_SYNONYMS: &[(ProfileField, &[&str])] = &[
    (
        ProfileField::ClientName,
        &[
            "client", "client name", "company", "company name", "brand", "customer",
            "account", "organization",
        ],
    ),
    (
        ProfileField::Industry,
        &["industry", "sector", "market", "vertical", "business type"],
    ),
    (
        ProfileField::Products,
        &["products", "product", "games", "game", "titles", "franchises", "product lines"],
    ),
    (
        ProfileField::Executives,
        &["executives", "executive", "leadership", "key people", "spokespeople"],
    ),
    (
        ProfileField::Competitors,
        &["competitors", "competitor", "competition", "rivals", "competitive set"],
    ),
    (
        ProfileField::ExcludedTopics,
        &[
            "exclude", "excluded topics", "exclusions", "avoid", "topics to avoid",
            "do not cover", "ignore",
        ],
    ),
    (
        ProfileField::Sources,
        &["sources", "media sources", "outlets", "publications", "media"],
    ),
    (
        ProfileField::Briefing,
        &[
            "schedule", "delivery", "delivery time", "audience", "recipients", "frequency",
            "length", "briefing",
        ],
    ),
    (
        ProfileField::Contacts,
        &["contact", "contacts", "client contact", "point of contact", "email"],
    ),
];

/// Similarity of two labels in [0.0, 1.0]
///
/// Identical (case-insensitive) labels score 1.0, substring containment
/// scores [`CONTAINMENT_SCORE`], anything else scores its normalized
/// Levenshtein similarity. The contained string needs at least
/// [`MIN_CONTAINMENT_CHARS`] characters.
///
/// # Examples
///
/// ```
/// use dossier_extractor::similarity;
///
/// assert_eq!(similarity("Competitors", "competitors"), 1.0);
/// assert_eq!(similarity("Competitors to watch", "competitors"), 0.8);
/// assert_eq!(similarity("Clientname", "client"), 0.8);
/// assert!(similarity("Competiters", "competitors") > 0.9);
/// ```
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let (shorter, longer) = if a.chars().count() <= b.chars().count() {
        (&a, &b)
    } else {
        (&b, &a)
    };
    if shorter.chars().count() >= MIN_CONTAINMENT_CHARS && longer.contains(shorter.as_str()) {
        return CONTAINMENT_SCORE;
    }

    strsim::normalized_levenshtein(&a, &b)
}

/// Maps free-form labels onto profile fields
#[derive(Clone)]
pub struct FieldMatcher {
    synonyms: Vec<(ProfileField, String)>,
    threshold: f64,
    fuzzy: bool,
    learner: Arc<dyn PatternLearner>,
}

impl FieldMatcher {
    /// Create a matcher over the built-in synonyms plus `custom`
    pub fn new(
        custom: Vec<(ProfileField, String)>,
        threshold: f64,
        fuzzy: bool,
        learner: Arc<dyn PatternLearner>,
    ) -> Self {
        let mut synonyms: Vec<(ProfileField, String)> = FIELD_SYNONYMS
            .iter()
            .flat_map(|(field, words)| words.iter().map(move |w| (*field, w.to_string())))
            .collect();
        for entry in custom {
            if !synonyms.contains(&entry) {
                synonyms.push(entry);
            }
        }
        Self {
            synonyms,
            threshold,
            fuzzy,
            learner,
        }
    }

    /// The same matcher with a different acceptance threshold
    pub fn with_threshold(&self, threshold: f64) -> Self {
        Self {
            threshold,
            ..self.clone()
        }
    }

    fn score(&self, label: &str, synonym: &str) -> f64 {
        if self.fuzzy {
            similarity(label, synonym)
        } else if label.trim().eq_ignore_ascii_case(synonym) {
            1.0
        } else {
            0.0
        }
    }

    /// Best field for a label, if its similarity exceeds the threshold
    ///
    /// Ties on similarity go to the field this label has mapped to most
    /// often, then to synonym table order.
    pub fn match_label(&self, label: &str) -> Option<(ProfileField, f64)> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }

        let mut best: Option<(ProfileField, f64, u64)> = None;
        for (field, synonym) in &self.synonyms {
            let score = self.score(label, synonym);
            if score <= self.threshold {
                continue;
            }
            let better = match best {
                None => true,
                Some((best_field, best_score, best_weight)) => {
                    if (score - best_score).abs() < 1e-9 {
                        *field != best_field
                            && self.learner.label_weight(*field, label) > best_weight
                    } else {
                        score > best_score
                    }
                }
            };
            if better {
                best = Some((*field, score, self.learner.label_weight(*field, label)));
            }
        }
        best.map(|(field, score, _)| (field, score))
    }

    /// Record a successful mapping with the learner
    pub fn record(&self, field: ProfileField, label: &str, value: &str) {
        self.learner.record_pattern(field, label, value);
    }
}

impl std::fmt::Debug for FieldMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldMatcher")
            .field("synonyms", &self.synonyms.len())
            .field("threshold", &self.threshold)
            .field("fuzzy", &self.fuzzy)
            .finish()
    }
}
