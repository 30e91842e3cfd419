//! Client-category detection and category defaults

use super::ExtractionStrategy;
use crate::error::ExtractorError;
use crate::values::split_label;
use dossier_domain::{ClientProfile, Competitor, CompetitorKind, DocumentStructure, Priority};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

/// Keyword hits needed before a category counts as detected
const MIN_CATEGORY_HITS: usize = 3;

/// Broad client category inferred from vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientCategory {
    /// Game publishers and studios
    Gaming,
    /// Software and hardware companies
    Technology,
    /// Providers, payers and pharma
    Healthcare,
}

impl ClientCategory {
    /// Every category, in detection order
    pub const ALL: [ClientCategory; 3] = [
        ClientCategory::Gaming,
        ClientCategory::Technology,
        ClientCategory::Healthcare,
    ];

    /// Lowercase name, as used for client-type validation rules
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientCategory::Gaming => "gaming",
            ClientCategory::Technology => "technology",
            ClientCategory::Healthcare => "healthcare",
        }
    }

    /// Industry written when the document names none
    pub fn default_industry(&self) -> &'static str {
        match self {
            ClientCategory::Gaming => "Gaming",
            ClientCategory::Technology => "Technology",
            ClientCategory::Healthcare => "Healthcare",
        }
    }

    /// Well-known companies seeded as low-priority indirect competitors
    pub fn known_competitors(&self) -> &'static [&'static str] {
        match self {
            ClientCategory::Gaming => &[
                "Electronic Arts",
                "Activision Blizzard",
                "Ubisoft",
                "Take-Two Interactive",
                "Epic Games",
            ],
            ClientCategory::Technology => &[
                "Microsoft",
                "Google",
                "Amazon Web Services",
                "Salesforce",
                "Oracle",
            ],
            ClientCategory::Healthcare => &[
                "UnitedHealth Group",
                "CVS Health",
                "Pfizer",
                "Johnson & Johnson",
                "HCA Healthcare",
            ],
        }
    }

    fn keywords(&self) -> &'static Regex {
        match self {
            ClientCategory::Gaming => &GAMING,
            ClientCategory::Technology => &TECHNOLOGY,
            ClientCategory::Healthcare => &HEALTHCARE,
        }
    }
}

impl fmt::Display for ClientCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static GAMING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:games?|gaming|gamers?|console|esports|playstation|xbox|nintendo|steam|studio|publisher|franchise|multiplayer|dlc|rpg|fps|mmo)\b",
    )
    .expect("gaming keywords should compile")
});

static TECHNOLOGY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:software|saas|cloud|platform|api|developers?|enterprise|ai|machine learning|data|cybersecurity|semiconductors?|devices?|tech|technology)\b",
    )
    .expect("technology keywords should compile")
});

static HEALTHCARE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:health|healthcare|hospitals?|patients?|clinical|pharma|pharmaceutical|medical|fda|drugs?|payers?|providers?|telehealth|biotech)\b",
    )
    .expect("healthcare keywords should compile")
});

static COMPETITOR_CUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:competitors?|competition|competitive|rivals?|versus|vs)\b")
        .expect("competitor cue should compile")
});

/// Category whose keywords dominate the text
///
/// A category is detected only with at least three hits and at least twice
/// the hits of the runner-up.
pub fn detect_category(text: &str) -> Option<ClientCategory> {
    let mut counts: Vec<(ClientCategory, usize)> = ClientCategory::ALL
        .iter()
        .map(|c| (*c, c.keywords().find_iter(text).count()))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let (best, best_hits) = counts[0];
    let runner_up = counts[1].1;
    if best_hits >= MIN_CATEGORY_HITS && best_hits >= runner_up * 2 {
        Some(best)
    } else {
        None
    }
}

/// Whether any line labels an industry
fn has_industry_label(text: &str) -> bool {
    text.lines().filter_map(split_label).any(|(label, _)| {
        matches!(
            label.to_lowercase().as_str(),
            "industry" | "sector" | "vertical" | "market"
        )
    })
}

/// Defaults industry and competitors from the detected client category
///
/// Defaults apply only where the document is silent: the industry when no
/// line labels one, competitors when no competitor cue appears at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextualStrategy;

impl ExtractionStrategy for ContextualStrategy {
    fn name(&self) -> &'static str {
        "contextual"
    }

    fn run(
        &self,
        text: &str,
        _structure: &DocumentStructure,
    ) -> Result<ClientProfile, ExtractorError> {
        let mut profile = ClientProfile::new();
        let Some(category) = detect_category(text) else {
            return Ok(profile);
        };
        debug!("Detected client category: {}", category);

        if !has_industry_label(text) {
            profile.industry = category.default_industry().to_string();
        }
        if !COMPETITOR_CUE.is_match(text) {
            for name in category.known_competitors() {
                profile.add_competitor(Competitor::new(
                    *name,
                    CompetitorKind::Indirect,
                    Priority::Low,
                ));
            }
        }
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAMING_NOTES: &str = "A console games publisher. Their studio ships a multiplayer \
                                franchise on Xbox and PlayStation every year.";

    #[test]
    fn test_detect_category() {
        assert_eq!(detect_category(GAMING_NOTES), Some(ClientCategory::Gaming));
        assert_eq!(
            detect_category("Hospital network focused on patients and clinical trials."),
            Some(ClientCategory::Healthcare)
        );
        assert_eq!(detect_category("A bakery in Leeds."), None);
    }

    #[test]
    fn test_mixed_vocabulary_is_not_confident() {
        let text = "Games studio and publisher building cloud software platform tools for developers.";
        assert_eq!(detect_category(text), None);
    }

    #[test]
    fn test_seeds_defaults_when_silent() {
        let profile = ContextualStrategy
            .run(GAMING_NOTES, &DocumentStructure::default())
            .unwrap();
        assert_eq!(profile.industry, "Gaming");
        assert_eq!(profile.competitors.len(), 5);
        assert!(profile
            .competitors
            .iter()
            .all(|c| c.kind == CompetitorKind::Indirect && c.priority == Priority::Low));
    }

    #[test]
    fn test_document_cues_suppress_defaults() {
        let text = format!("Industry: Interactive media\n{}\nCompetitors: Foo", GAMING_NOTES);
        let profile = ContextualStrategy
            .run(&text, &DocumentStructure::default())
            .unwrap();
        assert!(profile.is_empty());
    }
}
