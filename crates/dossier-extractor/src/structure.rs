//! Structure analysis: segmentation, classification, entities, metadata

use crate::preprocess::BULLET;
use dossier_domain::{push_unique, DocumentStructure, Entities, Section, SectionType};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;
use tracing::debug;

/// Offset scale for keyword weighting: a keyword this many bytes into a
/// fragment counts half as much extra as one at the start
const KEYWORD_DECAY_BYTES: f64 = 50.0;

/// Headers longer than this are treated as prose
const MAX_HEADER_CHARS: usize = 60;
const MAX_HEADER_WORDS: usize = 8;

static KEYWORDS: LazyLock<Vec<(SectionType, Regex)>> = LazyLock::new(|| {
    let table: [(SectionType, &[&str]); 7] = [
        (
            SectionType::Client,
            &["client", "company", "brand", "customer", "account", "organization"],
        ),
        (
            SectionType::Industry,
            &["industry", "sector", "market", "vertical", "business"],
        ),
        (
            SectionType::Competitor,
            &["competitor", "competitors", "competition", "rival", "rivals", "versus", "vs"],
        ),
        (
            SectionType::Source,
            &[
                "source", "sources", "tier", "outlet", "outlets", "publication",
                "publications", "media", "press", "hand search",
            ],
        ),
        (
            SectionType::Exclude,
            &[
                "exclude", "excluded", "exclusion", "exclusions", "avoid", "ignore", "do not",
                "don't", "skip", "sensitive",
            ],
        ),
        (
            SectionType::Schedule,
            &[
                "schedule", "daily", "weekly", "deliver", "delivery", "morning", "am", "pm",
                "deadline", "briefing",
            ],
        ),
        (
            SectionType::Description,
            &["about", "overview", "description", "background", "summary", "profile"],
        ),
    ];

    table
        .into_iter()
        .map(|(section_type, words)| {
            let alternation = words
                .iter()
                .map(|w| regex::escape(w))
                .collect::<Vec<_>>()
                .join("|");
            let pattern = format!(r"(?i)\b(?:{})\b", alternation);
            let regex = Regex::new(&pattern).expect("keyword pattern should compile");
            (section_type, regex)
        })
        .collect()
});

static TABLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\[\]]+\]").expect("table pattern should compile"));

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
        .expect("email pattern should compile")
});

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bhttps?://[^\s<>()\[\]"']+|\bwww\.[^\s<>()\[\]"']+"#)
        .expect("url pattern should compile")
});

static TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b\d{1,2}(?::\d{2})?\s?(?i:am|pm)\b(?:\s(?:UTC|GMT|[ECMP][SD]T))?|\b\d{1,2}:\d{2}\b(?:\s(?:UTC|GMT|[ECMP][SD]T))?",
    )
    .expect("time pattern should compile")
});

static ORGANIZATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:[A-Z][A-Za-z0-9&'-]*\s+){1,4}(?:Inc|Corp|Corporation|LLC|Ltd|Group|Games|Studios|Entertainment|Interactive|Technologies|Software|Labs|Health|Systems|Media)\b",
    )
    .expect("organization pattern should compile")
});

static PERSON_WITH_ROLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b([A-Z][a-z]+(?:\s[A-Z]\.)?\s[A-Z][a-z]+(?:-[A-Z][a-z]+)?)\s*(?:,|-|\()\s*(?:CEO|CTO|CFO|COO|CMO|President|Founder|Co-Founder|Director|VP|Vice President|Head|Chief|Manager|Lead|Spokesperson)\b",
    )
    .expect("person pattern should compile")
});

static PERSON_WITH_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:Mr|Mrs|Ms|Dr)\.?\s+([A-Z][a-z]+(?:\s[A-Z][a-z]+)?)")
        .expect("title pattern should compile")
});

static METADATA_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(?:- )?([A-Za-z][A-Za-z0-9 /&()'.]{0,39}?)[ \t]*(?::|[ \t]-[ \t])[ \t]*(\S.*?)[ \t]*$")
        .expect("metadata pattern should compile")
});

/// Segments normalized text into classified sections
#[derive(Debug, Clone)]
pub struct StructureAnalyzer {
    min_fragment_length: usize,
}

impl Default for StructureAnalyzer {
    fn default() -> Self {
        Self::new(20)
    }
}

impl StructureAnalyzer {
    /// Create an analyzer that drops fragments of `min_fragment_length`
    /// bytes or fewer
    pub fn new(min_fragment_length: usize) -> Self {
        Self { min_fragment_length }
    }

    /// Segment, classify and annotate normalized text
    pub fn analyze(&self, text: &str) -> DocumentStructure {
        let mut spans: BTreeSet<(usize, usize)> = BTreeSet::new();
        spans.extend(paragraph_spans(text));
        spans.extend(table_spans(text));
        spans.extend(bullet_run_spans(text));

        let sections: Vec<Section> = spans
            .into_iter()
            .filter(|(start, end)| text[*start..*end].trim().len() > self.min_fragment_length)
            .map(|(start, end)| build_section(text, start, end))
            .collect();

        debug!("Structure analysis produced {} sections", sections.len());
        DocumentStructure { sections }
    }
}

fn build_section(text: &str, start: usize, end: usize) -> Section {
    let raw_text = &text[start..end];
    Section {
        header: detect_header(raw_text),
        start_offset: start,
        end_offset: end,
        raw_text: raw_text.to_string(),
        section_type: classify(raw_text),
        entities: extract_entities(raw_text),
        metadata: extract_metadata(raw_text),
    }
}

/// Lines of `text` with their byte offsets, line terminator excluded
pub(crate) fn lines_with_offsets(text: &str) -> Vec<(usize, &str)> {
    let mut offset = 0;
    text.split('\n')
        .map(|line| {
            let start = offset;
            offset += line.len() + 1;
            (start, line)
        })
        .collect()
}

/// Spans of blank-line-delimited paragraphs
fn paragraph_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;
    let mut end = 0;

    for (offset, line) in lines_with_offsets(text) {
        if line.trim().is_empty() {
            if let Some(s) = start.take() {
                spans.push((s, end));
            }
        } else {
            start.get_or_insert(offset);
            end = offset + line.len();
        }
    }
    if let Some(s) = start {
        spans.push((s, end));
    }
    spans
}

/// Spans of `[ ... ]` table blocks
fn table_spans(text: &str) -> Vec<(usize, usize)> {
    TABLE_BLOCK
        .find_iter(text)
        .map(|m| (m.start(), m.end()))
        .collect()
}

/// Spans of contiguous bullet lines, each extended to its header line
fn bullet_run_spans(text: &str) -> Vec<(usize, usize)> {
    let lines = lines_with_offsets(text);
    let mut spans = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if !lines[i].1.starts_with(BULLET) {
            i += 1;
            continue;
        }
        let run_start = i;
        while i < lines.len() && lines[i].1.starts_with(BULLET) {
            i += 1;
        }
        let (last_offset, last_line) = lines[i - 1];
        let end = last_offset + last_line.len();

        let start = match run_start.checked_sub(1).map(|p| lines[p]) {
            Some((offset, prev)) if is_header_line(prev) => offset,
            _ => lines[run_start].0,
        };
        spans.push((start, end));
    }
    spans
}

/// Whether a line reads as a section header
///
/// Short, no sentence punctuation, no mid-line colon, and either
/// colon-terminated or title-cased / all caps.
pub(crate) fn is_header_line(line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() || line.starts_with(BULLET.trim_end()) || line.chars().count() > MAX_HEADER_CHARS
    {
        return false;
    }

    let colon_terminated = line.ends_with(':');
    let body = line.trim_end_matches(':').trim_end();
    if body.is_empty() || body.contains(':') || body.ends_with(['.', '!', '?', ',']) {
        return false;
    }
    let words: Vec<&str> = body.split_whitespace().collect();
    if words.len() > MAX_HEADER_WORDS {
        return false;
    }
    if colon_terminated {
        return true;
    }

    let alphabetic: Vec<&&str> = words
        .iter()
        .filter(|w| w.chars().next().is_some_and(char::is_alphabetic))
        .collect();
    if alphabetic.is_empty() {
        return false;
    }
    let all_caps = body.chars().any(char::is_alphabetic)
        && !body.chars().any(char::is_lowercase);
    let title_case = alphabetic
        .iter()
        .filter(|w| w.len() > 3 || alphabetic.len() == 1)
        .all(|w| w.chars().next().is_some_and(char::is_uppercase));
    all_caps || (title_case && words.len() <= 6)
}

/// Header of a fragment: its first line, when that reads as a header and
/// a non-blank line follows
fn detect_header(fragment: &str) -> Option<String> {
    let mut lines = fragment.lines();
    let first = lines.next()?;
    let next = lines.next()?;
    if next.trim().is_empty() || !is_header_line(first) {
        return None;
    }
    Some(first.trim().trim_end_matches(':').trim_end().to_string())
}

/// Keyword score of a fragment for every scored section type
pub(crate) fn keyword_scores(fragment: &str) -> Vec<(SectionType, f64)> {
    KEYWORDS
        .iter()
        .map(|(section_type, regex)| {
            let score = regex
                .find_iter(fragment)
                .map(|m| 1.0 + 0.5_f64.powf(m.start() as f64 / KEYWORD_DECAY_BYTES))
                .sum();
            (*section_type, score)
        })
        .collect()
}

/// Classify a fragment by arg-max keyword score
///
/// No keyword at all yields `Unknown`; an exact tie for the top score
/// yields `Description`.
pub fn classify(fragment: &str) -> SectionType {
    pick_section_type(&keyword_scores(fragment))
}

pub(crate) fn pick_section_type(scores: &[(SectionType, f64)]) -> SectionType {
    let best = scores.iter().map(|(_, s)| *s).fold(0.0_f64, f64::max);
    if best <= 0.0 {
        return SectionType::Unknown;
    }

    let leaders: Vec<SectionType> = scores
        .iter()
        .filter(|(_, s)| (best - s).abs() < 1e-9)
        .map(|(t, _)| *t)
        .collect();
    match leaders.as_slice() {
        [only] => *only,
        _ => SectionType::Description,
    }
}

/// Run the five entity pattern families over a fragment
pub fn extract_entities(fragment: &str) -> Entities {
    let mut entities = Entities::default();

    for m in ORGANIZATION.find_iter(fragment) {
        push_unique(&mut entities.organizations, m.as_str());
    }
    for regex in [&*PERSON_WITH_ROLE, &*PERSON_WITH_TITLE] {
        for caps in regex.captures_iter(fragment) {
            if let Some(name) = caps.get(1) {
                push_unique(&mut entities.persons, name.as_str());
            }
        }
    }
    for m in EMAIL.find_iter(fragment) {
        push_unique(&mut entities.emails, m.as_str());
    }
    for m in URL.find_iter(fragment) {
        push_unique(
            &mut entities.urls,
            m.as_str().trim_end_matches(['.', ',', ';']),
        );
    }
    for m in TIME.find_iter(fragment) {
        push_unique(&mut entities.times, m.as_str());
    }

    entities
}

/// `label: value` and `label - value` lines, keyed by lower-cased label
///
/// The first occurrence of a label wins.
pub fn extract_metadata(fragment: &str) -> BTreeMap<String, String> {
    let mut metadata = BTreeMap::new();
    for caps in METADATA_LINE.captures_iter(fragment) {
        let times = caps[1].ends_with(|c: char| c.is_ascii_digit())
            && caps[2].starts_with(|c: char| c.is_ascii_digit());
        if caps[2].starts_with("//") || times {
            continue;
        }
        let key = caps[1].trim().to_lowercase();
        metadata
            .entry(key)
            .or_insert_with(|| caps[2].trim().to_string());
    }
    metadata
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_detection() {
        assert!(is_header_line("Competitors:"));
        assert!(is_header_line("Tier 1 Sources"));
        assert!(is_header_line("MEDIA MONITORING"));
        assert!(is_header_line("Topics to Avoid"));
        assert!(!is_header_line("Client: Acme Corp"));
        assert!(!is_header_line("Acme makes games for consoles."));
        assert!(!is_header_line("- Foo"));
        assert!(!is_header_line("we track these rivals"));
    }

    #[test]
    fn test_paragraph_and_bullet_segmentation() {
        let text = "Overview of the account and its goals\n\nCompetitors:\n- Electronic Arts\n- Ubisoft Entertainment";
        let structure = StructureAnalyzer::default().analyze(text);

        assert_eq!(structure.sections.len(), 2);
        let competitors = &structure.sections[1];
        assert_eq!(competitors.header.as_deref(), Some("Competitors"));
        assert_eq!(competitors.section_type, SectionType::Competitor);
        assert_eq!(competitors.body(), "- Electronic Arts\n- Ubisoft Entertainment");
        assert_eq!(&text[competitors.start_offset..competitors.end_offset], competitors.raw_text);
    }

    #[test]
    fn test_short_fragments_are_dropped() {
        let structure = StructureAnalyzer::default().analyze("Too short\n\nAlso short");
        assert!(structure.is_empty());
    }

    #[test]
    fn test_table_blocks_are_sections() {
        let text = "Sources are listed below\n[Tier 1 | IGN | GameSpot | Polygon]";
        let structure = StructureAnalyzer::default().analyze(text);
        let table = structure
            .sections
            .iter()
            .find(|s| s.raw_text.starts_with('['))
            .unwrap();
        assert_eq!(table.section_type, SectionType::Source);
        // paragraph and table overlap and both survive
        assert_eq!(structure.sections.len(), 2);
    }

    #[test]
    fn test_sections_sorted_by_offset() {
        let text = "First paragraph about the client brand\n\nSecond paragraph about the market\n\n- one bullet item here";
        let structure = StructureAnalyzer::default().analyze(text);
        let offsets: Vec<usize> = structure.sections.iter().map(|s| s.start_offset).collect();
        let mut sorted = offsets.clone();
        sorted.sort();
        assert_eq!(offsets, sorted);
        // the bullet paragraph and bullet run share a span and collapse
        assert_eq!(structure.sections.len(), 3);
    }

    #[test]
    fn test_classification() {
        assert_eq!(classify("Competitors: Foo, Bar, Baz"), SectionType::Competitor);
        assert_eq!(classify("Tier 1 sources: IGN"), SectionType::Source);
        assert_eq!(classify("Please avoid politics"), SectionType::Exclude);
        assert_eq!(classify("nothing to see"), SectionType::Unknown);
    }

    #[test]
    fn test_earlier_keywords_weigh_more() {
        assert_eq!(classify("client market"), SectionType::Client);
        assert_eq!(classify("market client"), SectionType::Industry);
        // two later keywords outweigh one early one
        assert_eq!(classify("media and press vs rival"), SectionType::Source);
        assert!(keyword_scores("x").iter().all(|(_, s)| *s == 0.0));
    }

    #[test]
    fn test_tie_goes_to_description() {
        let scores = [
            (SectionType::Client, 2.0),
            (SectionType::Competitor, 2.0),
            (SectionType::Source, 1.5),
        ];
        assert_eq!(pick_section_type(&scores), SectionType::Description);
        assert_eq!(pick_section_type(&[(SectionType::Exclude, 0.0)]), SectionType::Unknown);
        assert_eq!(
            pick_section_type(&[(SectionType::Exclude, 1.2), (SectionType::Client, 1.1)]),
            SectionType::Exclude
        );
    }

    #[test]
    fn test_entities() {
        let fragment = "Contact Jane Doe, CEO at Acme Games (jane@acme.com), https://acme.com. Calls at 9:30 AM EST or 14:00.";
        let entities = extract_entities(fragment);
        assert_eq!(entities.emails, vec!["jane@acme.com"]);
        assert_eq!(entities.urls, vec!["https://acme.com"]);
        assert!(entities.persons.contains(&"Jane Doe".to_string()));
        assert!(entities.organizations.iter().any(|o| o.ends_with("Acme Games")));
        assert_eq!(entities.times, vec!["9:30 AM EST", "14:00"]);
    }

    #[test]
    fn test_entities_dedup_within_fragment() {
        let entities = extract_entities("a@b.co and a@b.co");
        assert_eq!(entities.emails.len(), 1);
    }

    #[test]
    fn test_metadata() {
        let metadata = extract_metadata("Client: Acme Corp\nIndustry - Software\n- Tier 1: IGN\nClient: Other\nSee https://x.io");
        assert_eq!(metadata.get("client").map(String::as_str), Some("Acme Corp"));
        assert_eq!(metadata.get("industry").map(String::as_str), Some("Software"));
        assert_eq!(metadata.get("tier 1").map(String::as_str), Some("IGN"));
        assert!(!metadata.contains_key("see https"));

        let metadata = extract_metadata("Delivered at 7:30 AM EST");
        assert!(metadata.is_empty());
    }
}
