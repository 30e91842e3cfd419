//! Weaker heuristics for documents the strategies could not read
//!
//! The fallback runs only below the confidence threshold. Each heuristic
//! proposes a profile (the current one merged with its own findings); the
//! proposal with the highest coverage improvement is adopted, and only if it
//! improves on the current profile at all.

use crate::error::ExtractorError;
use crate::fuzzy::FieldMatcher;
use crate::merge::merge_into;
use crate::strategies::ExtractionStrategy;
use crate::values::{assign_field, clean_value, split_list, tier_from_label, LabeledLine};
use dossier_domain::{ClientProfile, Competitor, DocumentStructure, ProfileField, SourceTier};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Label-matching threshold used by table scraping
pub const TABLE_MATCH_THRESHOLD: f64 = 0.5;

/// Words dropped from the start of a capitalized phrase
const LEADING_STOPWORDS: &[&str] = &[
    "The", "A", "An", "Our", "Their", "This", "That", "These", "In", "On", "At", "For", "And",
    "But", "When", "With", "From", "By", "As", "If", "Client", "Notes", "Dear", "Hi", "Hello",
];

static TABLE_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:- )?[ \t]*([A-Za-z][A-Za-z0-9 /&()'.-]{0,39}?)[ \t]*(?::|=|\|)[ \t]*(\S.*?)[ \t|]*$")
        .expect("table row pattern should compile")
});

static TABLE_CELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\[\]]+)\]").expect("table cell pattern should compile"));

static CAPITALIZED_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z][A-Za-z&'-]+(?:[ \t]+[A-Z][A-Za-z&'-]+)+")
        .expect("capitalized phrase pattern should compile")
});

static DEFINITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b([A-Z][\w&'.-]*(?:[ \t]+[A-Z][\w&'.-]*){0,4})[ \t]+is an?[ \t]+(?:leading[ \t]+|major[ \t]+|global[ \t]+|small[ \t]+|independent[ \t]+)?([a-z][\w-]*(?:[ \t][a-z][\w-]*){0,2}?)[ \t]+(?:company|firm|studio|publisher|developer|provider|brand|startup|business|agency|network|maker|manufacturer)\b",
    )
    .expect("definition pattern should compile")
});

static LIST_JOINER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i),?[ \t]+(?:and|or|as well as)[ \t]+").expect("joiner pattern should compile")
});

/// Cue phrases that introduce a list, and the field the list feeds
static CUE_LISTS: LazyLock<Vec<(ProfileField, Regex)>> = LazyLock::new(|| {
    [
        (
            ProfileField::Competitors,
            r"(?i)\b(?:competitors|rivals|competition)[ \t]+(?:include|includes|are|is)[ \t]*:?[ \t]*([^.\n]+)",
        ),
        (
            ProfileField::Competitors,
            r"(?i)\bcompetes?[ \t]+(?:with|against)[ \t]+([^.\n]+)",
        ),
        (
            ProfileField::ExcludedTopics,
            r"(?i)\b(?:avoid|exclude|do not cover|don't cover|stay away from)[ \t]*:?[ \t]+([^.\n]+)",
        ),
        (
            ProfileField::Sources,
            r"(?i)\b(?:sources|outlets|publications)[ \t]+(?:include|includes|are)[ \t]*:?[ \t]*([^.\n]+)",
        ),
        (
            ProfileField::Products,
            r"(?i)\b(?:games|products|titles|franchises)[ \t]+(?:include|includes|are)[ \t]*:?[ \t]*([^.\n]+)",
        ),
    ]
    .into_iter()
    .map(|(field, pattern)| (field, Regex::new(pattern).expect("cue pattern should compile")))
    .collect()
});

/// Drop leading stopwords; None if fewer than two words remain
fn trim_leading_stopwords(phrase: &str) -> Option<String> {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    let start = words
        .iter()
        .position(|w| !LEADING_STOPWORDS.contains(w))
        .unwrap_or(words.len());
    let rest = &words[start..];
    (rest.len() >= 2).then(|| rest.join(" "))
}

/// Fraction of profile fields that grew from `before` to `after`
pub fn coverage_improvement(before: &ClientProfile, after: &ClientProfile) -> f64 {
    let improved = ProfileField::ALL
        .iter()
        .filter(|f| after.field_size(**f) > before.field_size(**f))
        .count();
    improved as f64 / ProfileField::ALL.len() as f64
}

/// Generic `label: value`, `label = value` and table-cell scraping with a
/// loose label threshold
#[derive(Debug, Clone)]
pub struct TableScrape {
    matcher: FieldMatcher,
}

impl TableScrape {
    /// Create a scraper; the matcher's threshold is lowered to
    /// [`TABLE_MATCH_THRESHOLD`]
    pub fn new(matcher: &FieldMatcher) -> Self {
        Self {
            matcher: matcher.with_threshold(TABLE_MATCH_THRESHOLD),
        }
    }

    fn scrape_row(&self, row: &str, profile: &mut ClientProfile) {
        let row = row.trim().trim_start_matches('|').trim();
        let Some(caps) = TABLE_ROW.captures(row) else {
            return;
        };
        let label = caps[1].trim();
        let value = caps[2].trim();
        if value.starts_with("//") {
            return;
        }
        let field = if tier_from_label(label).is_some() {
            Some(ProfileField::Sources)
        } else {
            self.matcher.match_label(label).map(|(field, _)| field)
        };
        if let Some(field) = field {
            let entry = LabeledLine {
                label: label.to_string(),
                value: value.to_string(),
                items: Vec::new(),
            };
            assign_field(profile, field, label, &entry);
        }
    }
}

impl ExtractionStrategy for TableScrape {
    fn name(&self) -> &'static str {
        "table_scrape"
    }

    fn run(&self, text: &str, _structure: &DocumentStructure) -> Result<ClientProfile, ExtractorError> {
        let mut profile = ClientProfile::new();
        for line in text.lines() {
            self.scrape_row(line, &mut profile);
        }
        for caps in TABLE_CELL.captures_iter(text) {
            self.scrape_row(&caps[1], &mut profile);
        }
        Ok(profile)
    }
}

/// Guesses the client name as the most repeated capitalized phrase
///
/// A phrase needs two or more capitalized words and at least two
/// occurrences; ties go to the phrase seen first.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapitalizedFrequency;

impl ExtractionStrategy for CapitalizedFrequency {
    fn name(&self) -> &'static str {
        "capitalized_frequency"
    }

    fn run(&self, text: &str, _structure: &DocumentStructure) -> Result<ClientProfile, ExtractorError> {
        let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
        for m in CAPITALIZED_PHRASE.find_iter(text) {
            if let Some(phrase) = trim_leading_stopwords(m.as_str()) {
                counts.entry(phrase).or_insert((0, m.start())).0 += 1;
            }
        }

        let mut profile = ClientProfile::new();
        let best = counts
            .into_iter()
            .filter(|(_, (count, _))| *count >= 2)
            .max_by(|a, b| a.1 .0.cmp(&b.1 .0).then(b.1 .1.cmp(&a.1 .1)));
        if let Some((phrase, (count, _))) = best {
            debug!("Most repeated capitalized phrase: {} ({} times)", phrase, count);
            profile.client_name = phrase;
        }
        Ok(profile)
    }
}

/// "X is a Y company" sentences: X as the client, Y as the industry
#[derive(Debug, Clone, Copy, Default)]
pub struct Definition;

impl ExtractionStrategy for Definition {
    fn name(&self) -> &'static str {
        "definition"
    }

    fn run(&self, text: &str, _structure: &DocumentStructure) -> Result<ClientProfile, ExtractorError> {
        let mut profile = ClientProfile::new();
        if let Some(caps) = DEFINITION.captures(text) {
            let subject = caps[1].trim();
            let subject = trim_leading_stopwords(subject)
                .or_else(|| {
                    let single = subject.split_whitespace().last()?;
                    (!LEADING_STOPWORDS.contains(&single)).then(|| single.to_string())
                })
                .unwrap_or_default();
            profile.client_name = clean_value(&subject);
            profile.industry = clean_value(&caps[2]);
        }
        Ok(profile)
    }
}

/// Lists following cue phrases such as "competitors include" or "avoid"
#[derive(Debug, Clone, Copy, Default)]
pub struct CueLists;

impl ExtractionStrategy for CueLists {
    fn name(&self) -> &'static str {
        "cue_lists"
    }

    fn run(&self, text: &str, _structure: &DocumentStructure) -> Result<ClientProfile, ExtractorError> {
        let mut profile = ClientProfile::new();
        for (field, regex) in CUE_LISTS.iter() {
            for caps in regex.captures_iter(text) {
                let list = LIST_JOINER.replace_all(&caps[1], ", ");
                for item in split_list(&list) {
                    match field {
                        ProfileField::Competitors => {
                            profile.add_competitor(Competitor::new(item, Default::default(), Default::default()));
                        }
                        ProfileField::ExcludedTopics => {
                            profile.add_excluded_topic(item);
                        }
                        ProfileField::Sources => {
                            profile.sources.push(SourceTier::Tier2, item);
                        }
                        _ => {
                            profile.add_product(item);
                        }
                    }
                }
            }
        }
        Ok(profile)
    }
}

/// What the fallback decided
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackOutcome {
    /// The adopted profile, or the unchanged input
    pub profile: ClientProfile,
    /// Heuristic whose proposal was adopted
    pub heuristic: Option<&'static str>,
    /// Coverage improvement of the adopted proposal
    pub improvement: f64,
    /// Heuristics that failed, with their error messages
    pub failures: Vec<(&'static str, String)>,
}

/// Runs the fallback heuristics and keeps the best improvement
pub struct FallbackParser {
    heuristics: Vec<Box<dyn ExtractionStrategy>>,
    max_value_length: usize,
}

impl FallbackParser {
    /// Create a fallback parser with the four built-in heuristics
    pub fn new(matcher: &FieldMatcher, max_value_length: usize) -> Self {
        Self::with_heuristics(
            vec![
                Box::new(TableScrape::new(matcher)),
                Box::new(CapitalizedFrequency),
                Box::new(Definition),
                Box::new(CueLists),
            ],
            max_value_length,
        )
    }

    /// Create a fallback parser over custom heuristics
    pub fn with_heuristics(
        heuristics: Vec<Box<dyn ExtractionStrategy>>,
        max_value_length: usize,
    ) -> Self {
        Self {
            heuristics,
            max_value_length,
        }
    }

    /// Names of the heuristics, in run order
    pub fn heuristic_names(&self) -> Vec<&'static str> {
        self.heuristics.iter().map(|h| h.name()).collect()
    }

    /// Run every heuristic against `current`
    ///
    /// A proposal is adopted only if its improvement is above zero and
    /// strictly above every earlier proposal's; otherwise the current
    /// profile is returned unchanged.
    pub fn run(
        &self,
        current: &ClientProfile,
        text: &str,
        structure: &DocumentStructure,
    ) -> FallbackOutcome {
        let mut outcome = FallbackOutcome {
            profile: current.clone(),
            heuristic: None,
            improvement: 0.0,
            failures: Vec::new(),
        };

        for heuristic in &self.heuristics {
            let partial = match heuristic.run(text, structure) {
                Ok(partial) => partial,
                Err(e) => {
                    warn!("Fallback heuristic {} failed: {}", heuristic.name(), e);
                    outcome.failures.push((heuristic.name(), e.to_string()));
                    continue;
                }
            };

            let mut candidate = current.clone();
            merge_into(&mut candidate, partial, self.max_value_length);
            let improvement = coverage_improvement(current, &candidate);
            debug!("Fallback heuristic {} improvement {:.3}", heuristic.name(), improvement);

            if improvement > outcome.improvement {
                outcome.profile = candidate;
                outcome.heuristic = Some(heuristic.name());
                outcome.improvement = improvement;
            }
        }
        outcome
    }
}

impl std::fmt::Debug for FallbackParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackParser")
            .field("heuristics", &self.heuristic_names())
            .field("max_value_length", &self.max_value_length)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dossier_domain::NoopLearner;
    use std::sync::Arc;

    fn matcher() -> FieldMatcher {
        FieldMatcher::new(Vec::new(), 0.7, true, Arc::new(NoopLearner))
    }

    fn run_one(strategy: &dyn ExtractionStrategy, text: &str) -> ClientProfile {
        strategy.run(text, &DocumentStructure::default()).unwrap()
    }

    struct Broken;

    impl ExtractionStrategy for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn run(&self, _text: &str, _structure: &DocumentStructure) -> Result<ClientProfile, ExtractorError> {
            Err(ExtractorError::strategy("broken", "always fails"))
        }
    }

    #[test]
    fn test_table_scrape() {
        let scrape = TableScrape::new(&matcher());
        let profile = run_one(
            &scrape,
            "| Clent | Acme |\nSectr = Retail\n[Tier 1 | IGN] [Tier 3 | Blogs]",
        );
        assert_eq!(profile.client_name, "Acme");
        assert_eq!(profile.industry, "Retail");
        assert_eq!(profile.sources.tier1, vec!["IGN"]);
        assert_eq!(profile.sources.tier3, vec!["Blogs"]);
    }

    #[test]
    fn test_capitalized_frequency() {
        let text = "We met Northwind Traders last week. The Northwind Traders team wants \
                    coverage. Contoso Pharma came up once. Northwind Traders ships soon.";
        let profile = run_one(&CapitalizedFrequency, text);
        assert_eq!(profile.client_name, "Northwind Traders");

        assert!(run_one(&CapitalizedFrequency, "Only Once Here").is_empty());
    }

    #[test]
    fn test_capitalized_frequency_ties_go_to_first_seen() {
        let text = "Blue Harbor and Red Canyon. Red Canyon and Blue Harbor.";
        let profile = run_one(&CapitalizedFrequency, text);
        assert_eq!(profile.client_name, "Blue Harbor");
    }

    #[test]
    fn test_definition() {
        let profile = run_one(&Definition, "The Initech is a small software company in Austin.");
        assert_eq!(profile.client_name, "Initech");
        assert_eq!(profile.industry, "software");
    }

    #[test]
    fn test_cue_lists() {
        let text = "Main competitors include Globex, Initech and Umbrella. \
                    Please avoid layoffs or lawsuits. Games include Star Raid.";
        let profile = run_one(&CueLists, text);
        assert_eq!(profile.competitor_names(), vec!["Globex", "Initech", "Umbrella"]);
        assert_eq!(profile.excluded_topics, vec!["layoffs", "lawsuits"]);
        assert_eq!(profile.products, vec!["Star Raid"]);
    }

    #[test]
    fn test_coverage_improvement() {
        let before = ClientProfile::new();
        let mut after = ClientProfile::new();
        after.client_name = "Acme".to_string();
        after.add_product("Rockets");
        assert!((coverage_improvement(&before, &after) - 2.0 / 9.0).abs() < 1e-9);
        assert_eq!(coverage_improvement(&after, &after), 0.0);
    }

    #[test]
    fn test_adopts_best_improvement() {
        let fallback = FallbackParser::new(&matcher(), 100);
        let text = "Main competitors include Globex and Initech. Please avoid layoffs. \
                    Northwind Traders is a retail company. Northwind Traders grows.";
        let outcome = fallback.run(&ClientProfile::new(), text, &DocumentStructure::default());
        // cue lists fill two fields; definition also fills two but runs first
        assert_eq!(outcome.heuristic, Some("definition"));
        assert!((outcome.improvement - 2.0 / 9.0).abs() < 1e-9);
        assert_eq!(outcome.profile.client_name, "Northwind Traders");
    }

    #[test]
    fn test_no_improvement_keeps_original() {
        let fallback = FallbackParser::new(&matcher(), 100);
        let mut current = ClientProfile::new();
        current.client_name = "Acme".to_string();
        let outcome = fallback.run(&current, "nothing useful here", &DocumentStructure::default());
        assert_eq!(outcome.heuristic, None);
        assert_eq!(outcome.profile, current);
    }

    #[test]
    fn test_failing_heuristic_is_isolated() {
        let fallback =
            FallbackParser::with_heuristics(vec![Box::new(Broken), Box::new(CueLists)], 100);
        let outcome = fallback.run(
            &ClientProfile::new(),
            "Competitors include Globex.",
            &DocumentStructure::default(),
        );
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].0, "broken");
        assert_eq!(outcome.heuristic, Some("cue_lists"));
    }
}
