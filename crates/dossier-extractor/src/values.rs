//! Value parsing shared by the strategies and fallback heuristics

use crate::fuzzy::FieldMatcher;
use crate::preprocess::BULLET;
use dossier_domain::{
    BriefingInfo, ClientProfile, Competitor, CompetitorKind, Contact, Executive, Priority,
    ProfileField, SourceTier,
};
use regex::Regex;
use std::sync::LazyLock;

static LABEL_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:- )?([A-Za-z][A-Za-z0-9 /&()'.-]{0,39}?)[ \t]*:[ \t]*(.*)$")
        .expect("label line pattern should compile")
});

// `label - value`; the preprocessor has already folded en and em dashes
static DASH_LABEL_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9 /&()'.]{0,39}?)[ \t]+-[ \t]+(\S.*)$")
        .expect("dash label line pattern should compile")
});

static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^()]*\)").expect("parenthetical pattern should compile"));

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}")
        .expect("email pattern should compile")
});

static SENTIMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bsentiment\s*[:=]\s*([A-Za-z][A-Za-z ]*[A-Za-z])|\b(positive only|negative only|monitor all|neutral only|no negative)\b",
    )
    .expect("sentiment pattern should compile")
});

static EXECUTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([A-Z][A-Za-z.'-]+(?:\s+[A-Z][A-Za-z.'-]+){1,3})\s*(?:\(([^()]+)\)|(?:,|-|:)\s*(.+))?$",
    )
    .expect("executive pattern should compile")
});

/// Words that make a label a time, URL or sentence rather than a field name
const LABEL_STOPWORDS: &[&str] = &["http", "https", "note", "notes", "nb", "ps"];

/// Longest label, in words, treated as a field name
const MAX_LABEL_WORDS: usize = 5;

/// A `label: value` line and the bullet items that follow it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledLine {
    /// Label text as written
    pub label: String,
    /// Text after the separator, possibly empty
    pub value: String,
    /// Bullet lines directly following the label line
    pub items: Vec<String>,
}

impl LabeledLine {
    /// Value and items split into list entries
    pub fn list(&self) -> Vec<String> {
        let mut out = split_list(&self.value);
        for item in &self.items {
            out.extend(split_list(item));
        }
        out
    }

    /// Value and items as entries, split only on `;` and `|`
    ///
    /// Used for entries that carry commas themselves, such as
    /// "Jane Doe, CEO".
    pub fn records(&self) -> Vec<String> {
        let mut out = split_records(&self.value);
        for item in &self.items {
            out.extend(split_records(item));
        }
        out
    }

    /// Inline value, or the bullet items joined when there is none
    pub fn learned_value(&self) -> String {
        if self.value.trim().is_empty() {
            self.items.join(", ")
        } else {
            self.value.clone()
        }
    }

    /// Whether the line carries anything beyond its label
    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty() && self.items.is_empty()
    }
}

/// Split a label line into (label, value) if it has that shape
///
/// The separator is a colon, or a spaced dash on a line that is not a
/// bullet item.
pub fn split_label(line: &str) -> Option<(String, String)> {
    let line = line.trim_end();
    [&*LABEL_LINE, &*DASH_LABEL_LINE]
        .into_iter()
        .filter_map(|pattern| pattern.captures(line))
        .find_map(|caps| accept_label(caps[1].trim(), caps[2].trim()))
}

fn accept_label(label: &str, value: &str) -> Option<(String, String)> {
    if value.starts_with("//") || label.split_whitespace().count() > MAX_LABEL_WORDS {
        return None;
    }
    // "at 7:00" is a time, not a label
    if label.ends_with(|c: char| c.is_ascii_digit()) && value.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    let lower = label.to_lowercase();
    if LABEL_STOPWORDS.contains(&lower.as_str()) {
        return None;
    }
    Some((label.to_string(), value.to_string()))
}

/// Collect labeled lines with their following bullet items
///
/// Bullet lines that carry a label of their own start a new entry. A
/// label with no inline value may be separated from its bullets by one
/// blank line.
pub fn labeled_lines(text: &str) -> Vec<LabeledLine> {
    let mut entries: Vec<LabeledLine> = Vec::new();
    let mut collecting = false;

    for line in text.lines() {
        if let Some((label, value)) = split_label(line) {
            entries.push(LabeledLine {
                label,
                value,
                items: Vec::new(),
            });
            collecting = true;
            continue;
        }

        let Some(current) = entries.last_mut().filter(|_| collecting) else {
            continue;
        };
        if let Some(item) = line.strip_prefix(BULLET) {
            current.items.push(item.trim().to_string());
        } else if line.trim().is_empty() && current.is_empty() {
            continue;
        } else {
            collecting = false;
        }
    }
    entries
}

/// Trim a value, drop trailing punctuation and collapse inner whitespace
pub fn clean_value(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|c: char| matches!(c, '.' | ',' | ';' | ':' | '"' | '\''))
        .trim()
        .to_string()
}

/// Split list text on `,` `;` `|` and bullet lines
///
/// Items are cleaned; empty items are dropped. Duplicates are kept for the
/// caller's case-sensitive dedup.
pub fn split_list(text: &str) -> Vec<String> {
    split_on(text, &[',', ';', '|'])
}

/// Split record text on `;` `|` and bullet lines only
pub fn split_records(text: &str) -> Vec<String> {
    split_on(text, &[';', '|'])
}

fn split_on(text: &str, separators: &[char]) -> Vec<String> {
    let mut items = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        let line = line.strip_prefix(BULLET.trim_end()).unwrap_or(line);

        // Separators inside parentheses belong to the item
        let mut depth = 0usize;
        let mut current = String::new();
        for c in line.chars() {
            match c {
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                c if depth == 0 && separators.contains(&c) => {
                    items.push(clean_value(&current));
                    current.clear();
                    continue;
                }
                _ => {}
            }
            current.push(c);
        }
        items.push(clean_value(&current));
    }
    items.retain(|item| !item.is_empty());
    items
}

/// Tier named by a label such as "Tier 1", "Tier 2 Sources" or "Hand Search (weekly)"
pub fn tier_from_label(label: &str) -> Option<SourceTier> {
    let without_notes = PARENTHETICAL.replace_all(label, "");
    let words: Vec<&str> = without_notes
        .split_whitespace()
        .filter(|w| {
            !matches!(
                w.to_lowercase().as_str(),
                "sources" | "source" | "outlets" | "media" | "publications" | "list"
            )
        })
        .collect();
    SourceTier::parse(&words.join(" "))
}

/// Briefing slot a label refers to
pub fn briefing_slot(label: &str) -> BriefingSlot {
    let lower = label.to_lowercase();
    if ["audience", "recipient", "reader", "distribution"]
        .iter()
        .any(|w| lower.contains(w))
    {
        BriefingSlot::Audience
    } else if ["frequency", "length", "cadence", "pages", "format"]
        .iter()
        .any(|w| lower.contains(w))
    {
        BriefingSlot::Frequency
    } else {
        BriefingSlot::Schedule
    }
}

/// One of the three briefing keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BriefingSlot {
    /// Delivery time
    Schedule,
    /// Readers
    Audience,
    /// Length or cadence
    Frequency,
}

impl BriefingSlot {
    /// Set the slot if it is still empty
    pub fn fill(self, briefing: &mut BriefingInfo, value: &str) -> bool {
        let slot = match self {
            BriefingSlot::Schedule => &mut briefing.schedule,
            BriefingSlot::Audience => &mut briefing.audience,
            BriefingSlot::Frequency => &mut briefing.frequency,
        };
        let value = clean_value(value);
        if !slot.is_empty() || value.is_empty() {
            return false;
        }
        *slot = value;
        true
    }
}

/// Competitor from a list item, honoring "(indirect)" and priority notes
pub fn parse_competitor(item: &str) -> Option<Competitor> {
    let without_notes = PARENTHETICAL.replace_all(item, "");
    let (name, trailing) = without_notes
        .split_once(" - ")
        .unwrap_or((&*without_notes, ""));

    // Only the notes decide kind and priority, never the name itself
    let mut notes = trailing.to_lowercase();
    for m in PARENTHETICAL.find_iter(item) {
        notes.push(' ');
        notes.push_str(&m.as_str().to_lowercase());
    }
    let has = |word: &str| notes.split(|c: char| !c.is_alphanumeric()).any(|w| w == word);

    let kind = if has("indirect") {
        CompetitorKind::Indirect
    } else {
        CompetitorKind::Direct
    };
    let priority = if has("high") || has("primary") || has("key") {
        Priority::High
    } else if has("low") || has("secondary") {
        Priority::Low
    } else {
        Priority::Medium
    };

    let name = clean_value(name);
    if name.is_empty() {
        return None;
    }
    Some(Competitor::new(name, kind, priority))
}

/// Executive from "Name (Role)", "Name - Role" or "Name, Role" text
pub fn parse_executive(item: &str) -> Option<Executive> {
    let mut sentiment_policy = String::new();
    let mut rest = item.to_string();
    if let Some(caps) = SENTIMENT.captures(item) {
        if let Some(policy) = caps.get(1).or_else(|| caps.get(2)) {
            sentiment_policy = policy.as_str().trim().to_lowercase();
        }
        if let Some(whole) = caps.get(0) {
            rest.replace_range(whole.range(), "");
        }
    }
    let rest = clean_value(rest.trim_end_matches(['(', '[', ',', '-', ' ']).replace("()", "").as_str());

    let caps = EXECUTIVE.captures(&rest)?;
    let name = caps[1].trim().to_string();
    let role = caps
        .get(2)
        .or_else(|| caps.get(3))
        .map(|m| clean_value(m.as_str()))
        .unwrap_or_default();
    Some(Executive {
        name,
        role,
        sentiment_policy,
    })
}

/// Contact from "Name <email>", "Name, email, Role" or a bare email
pub fn parse_contact(item: &str) -> Option<Contact> {
    let email = EMAIL.find(item).map(|m| m.as_str().to_string()).unwrap_or_default();
    let without_email = match EMAIL.find(item) {
        Some(m) => format!("{} {}", &item[..m.start()], &item[m.end()..]),
        None => item.to_string(),
    };

    let role = PARENTHETICAL
        .find(&without_email)
        .map(|m| clean_value(m.as_str().trim().trim_matches(['(', ')'])))
        .unwrap_or_default();
    let without_role = PARENTHETICAL.replace_all(&without_email, "");

    let parts: Vec<String> = without_role
        .split([',', '<', '>', '|', ';'])
        .map(|p| clean_value(p.trim_matches(['-', ' '])))
        .filter(|p| !p.is_empty())
        .collect();
    let name = parts.first().cloned().unwrap_or_default();
    let role = if role.is_empty() {
        parts.get(1).cloned().unwrap_or_default()
    } else {
        role
    };

    if name.is_empty() && email.is_empty() {
        return None;
    }
    Some(Contact { name, email, role })
}

/// Write values for one field into a profile
///
/// Scalar fields keep their first value. Sources without a tier go to
/// tier2. Returns the number of values added.
pub fn assign_field(
    profile: &mut ClientProfile,
    field: ProfileField,
    label: &str,
    entry: &LabeledLine,
) -> usize {
    match field {
        ProfileField::ClientName | ProfileField::Industry => {
            let value = clean_value(&entry.value);
            let value = if value.is_empty() {
                entry.items.first().map(|i| clean_value(i)).unwrap_or_default()
            } else {
                value
            };
            let slot = if field == ProfileField::ClientName {
                &mut profile.client_name
            } else {
                &mut profile.industry
            };
            if slot.is_empty() && !value.is_empty() {
                *slot = value;
                1
            } else {
                0
            }
        }
        ProfileField::Products => entry
            .list()
            .into_iter()
            .filter(|p| profile.add_product(p.as_str()))
            .count(),
        ProfileField::ExcludedTopics => entry
            .list()
            .into_iter()
            .filter(|t| profile.add_excluded_topic(t.as_str()))
            .count(),
        ProfileField::Competitors => entry
            .list()
            .iter()
            .filter_map(|c| parse_competitor(c))
            .filter(|c| profile.add_competitor(c.clone()))
            .count(),
        ProfileField::Executives => entry
            .records()
            .iter()
            .filter_map(|e| parse_executive(e))
            .filter(|e| profile.add_executive(e.clone()))
            .count(),
        ProfileField::Contacts => entry
            .records()
            .iter()
            .filter_map(|c| parse_contact(c))
            .filter(|c| profile.add_contact(c.clone()))
            .count(),
        ProfileField::Sources => {
            let tier = tier_from_label(label).unwrap_or(SourceTier::Tier2);
            entry
                .list()
                .into_iter()
                .filter(|s| profile.sources.push(tier, s.as_str()))
                .count()
        }
        ProfileField::Briefing => {
            let value = if entry.value.trim().is_empty() {
                entry.items.join(", ")
            } else {
                entry.value.clone()
            };
            usize::from(briefing_slot(label).fill(&mut profile.briefing, &value))
        }
    }
}

/// Apply labeled lines to a profile through a field matcher
///
/// Tier labels go straight to their tier. Matched labels are recorded with
/// the matcher's learner when they yield at least one value.
pub fn apply_labeled_lines(
    profile: &mut ClientProfile,
    entries: &[LabeledLine],
    matcher: &FieldMatcher,
    learn: bool,
) -> usize {
    let mut added = 0;
    for entry in entries {
        if entry.is_empty() {
            continue;
        }
        let field = if tier_from_label(&entry.label).is_some() {
            Some(ProfileField::Sources)
        } else {
            matcher.match_label(&entry.label).map(|(field, _)| field)
        };
        let Some(field) = field else {
            continue;
        };

        let count = assign_field(profile, field, &entry.label, entry);
        if count > 0 && learn {
            matcher.record(field, &entry.label, &entry.learned_value());
        }
        added += count;
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("Foo, Bar; Baz | Qux."), vec!["Foo", "Bar", "Baz", "Qux"]);
        assert_eq!(split_list("- Foo\n- Bar,\n\n"), vec!["Foo", "Bar"]);
        assert_eq!(split_list(" , ;"), Vec::<String>::new());
        assert_eq!(split_list("EA, ea, EA"), vec!["EA", "ea", "EA"]);
        assert_eq!(
            split_list("Foo (indirect, low), Bar"),
            vec!["Foo (indirect, low)", "Bar"]
        );
    }

    #[test]
    fn test_split_label() {
        assert_eq!(
            split_label("Client: Acme Corp"),
            Some(("Client".to_string(), "Acme Corp".to_string()))
        );
        assert_eq!(
            split_label("- Tier 1: IGN"),
            Some(("Tier 1".to_string(), "IGN".to_string()))
        );
        assert_eq!(split_label("Competitors:"), Some(("Competitors".to_string(), String::new())));
        assert!(split_label("https://acme.com").is_none());
        assert!(split_label("Note: call back").is_none());
        assert!(split_label("We will deliver the report at 9: sharp").is_none());
        assert!(split_label("no label here").is_none());
        assert!(split_label("Daily briefing at 7:00 AM").is_none());
        assert_eq!(
            split_label("Competitors - Foo, Bar"),
            Some(("Competitors".to_string(), "Foo, Bar".to_string()))
        );
        assert!(split_label("- Jane Doe - CEO").is_none());
        assert!(split_label("Competitors -").is_none());
        assert_eq!(
            split_label("Schedule - Daily at 7:00 AM"),
            Some(("Schedule".to_string(), "Daily at 7:00 AM".to_string()))
        );
    }

    #[test]
    fn test_labeled_lines_collect_bullets() {
        let text = "Competitors:\n\n- Foo\n- Bar\nSome prose\n- stray\nTier 1: IGN\n- Polygon";
        let entries = labeled_lines(text);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].items, vec!["Foo", "Bar"]);
        assert_eq!(entries[1].list(), vec!["IGN", "Polygon"]);
    }

    #[test]
    fn test_tier_from_label() {
        assert_eq!(tier_from_label("Tier 1"), Some(SourceTier::Tier1));
        assert_eq!(tier_from_label("Tier 2 Sources"), Some(SourceTier::Tier2));
        assert_eq!(tier_from_label("Hand Search (weekly)"), Some(SourceTier::HandSearch));
        assert_eq!(tier_from_label("Sources"), None);
    }

    #[test]
    fn test_parse_competitor() {
        let c = parse_competitor("Foo Inc (indirect, low priority)").unwrap();
        assert_eq!(c.name, "Foo Inc");
        assert_eq!(c.kind, CompetitorKind::Indirect);
        assert_eq!(c.priority, Priority::Low);

        let c = parse_competitor("Bar - high priority").unwrap();
        assert_eq!(c.name, "Bar");
        assert_eq!(c.priority, Priority::High);
        assert_eq!(c.kind, CompetitorKind::Direct);

        assert!(parse_competitor("(tbd)").is_none());
    }

    #[test]
    fn test_parse_executive() {
        let e = parse_executive("Jane Doe (CEO) - sentiment: positive only").unwrap();
        assert_eq!(e.name, "Jane Doe");
        assert_eq!(e.role, "CEO");
        assert_eq!(e.sentiment_policy, "positive only");

        let e = parse_executive("John Roe, Chief Financial Officer").unwrap();
        assert_eq!(e.role, "Chief Financial Officer");
        assert!(e.sentiment_policy.is_empty());

        assert!(parse_executive("the board").is_none());
    }

    #[test]
    fn test_parse_contact() {
        let c = parse_contact("Jane Doe <jane@acme.com> (PR Lead)").unwrap();
        assert_eq!(c.name, "Jane Doe");
        assert_eq!(c.email, "jane@acme.com");
        assert_eq!(c.role, "PR Lead");

        let c = parse_contact("John Roe, john@acme.com, Comms").unwrap();
        assert_eq!(c.name, "John Roe");
        assert_eq!(c.role, "Comms");

        let c = parse_contact("press@acme.com").unwrap();
        assert!(c.name.is_empty());
        assert!(parse_contact(" , ").is_none());
    }

    #[test]
    fn test_briefing_slots() {
        let mut briefing = BriefingInfo::default();
        assert!(briefing_slot("Delivery Time").fill(&mut briefing, "7:00 AM EST"));
        assert!(briefing_slot("Audience").fill(&mut briefing, "Comms team"));
        assert!(briefing_slot("Length").fill(&mut briefing, "2 pages"));
        assert!(!briefing_slot("Schedule").fill(&mut briefing, "8 AM"));
        assert_eq!(briefing.schedule, "7:00 AM EST");
        assert_eq!(briefing.populated_keys(), 3);
    }

    #[test]
    fn test_untiered_sources_go_to_tier2() {
        let mut profile = ClientProfile::new();
        let entry = LabeledLine {
            label: "Sources".to_string(),
            value: "Kotaku, Eurogamer".to_string(),
            items: Vec::new(),
        };
        assert_eq!(assign_field(&mut profile, ProfileField::Sources, "Sources", &entry), 2);
        assert_eq!(profile.sources.tier2, vec!["Kotaku", "Eurogamer"]);
    }
}
