//! Document structure module - sections derived once per parse

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Semantic type assigned to a section by keyword scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    /// Client identity
    Client,
    /// Industry or market
    Industry,
    /// Competitor listing
    Competitor,
    /// Media sources
    Source,
    /// Topics to exclude
    Exclude,
    /// Delivery schedule
    Schedule,
    /// General description
    Description,
    /// Nothing recognizable
    Unknown,
}

impl SectionType {
    /// Types that can win keyword scoring, in fixed scoring order
    pub const SCORED: [SectionType; 7] = [
        SectionType::Client,
        SectionType::Industry,
        SectionType::Competitor,
        SectionType::Source,
        SectionType::Exclude,
        SectionType::Schedule,
        SectionType::Description,
    ];

    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionType::Client => "client",
            SectionType::Industry => "industry",
            SectionType::Competitor => "competitor",
            SectionType::Source => "source",
            SectionType::Exclude => "exclude",
            SectionType::Schedule => "schedule",
            SectionType::Description => "description",
            SectionType::Unknown => "unknown",
        }
    }
}

/// Lightweight entities found in a section
///
/// Matches are deduplicated within a section but not across sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Entities {
    /// Organization names
    pub organizations: Vec<String>,
    /// Person names
    pub persons: Vec<String>,
    /// Email addresses
    pub emails: Vec<String>,
    /// URLs
    pub urls: Vec<String>,
    /// Time expressions
    pub times: Vec<String>,
}

impl Entities {
    /// True when no entity of any kind was found
    pub fn is_empty(&self) -> bool {
        self.organizations.is_empty()
            && self.persons.is_empty()
            && self.emails.is_empty()
            && self.urls.is_empty()
            && self.times.is_empty()
    }
}

/// A contiguous span of normalized text addressing one topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Header line attached to the fragment, without a trailing colon
    pub header: Option<String>,
    /// Byte offset of the first character in the normalized text
    pub start_offset: usize,
    /// Byte offset one past the last character
    pub end_offset: usize,
    /// Fragment text
    pub raw_text: String,
    /// Classified semantic type
    pub section_type: SectionType,
    /// Entities found in the fragment
    pub entities: Entities,
    /// `label: value` lines, keyed by lower-cased label
    pub metadata: BTreeMap<String, String>,
}

impl Section {
    /// Body text with the header line removed, if the header is the first line
    pub fn body(&self) -> &str {
        match &self.header {
            Some(header) => {
                let first_line = self.raw_text.lines().next().unwrap_or("");
                if first_line.trim().trim_end_matches(':').trim() == header {
                    self.raw_text[first_line.len()..].trim_start_matches('\n')
                } else {
                    &self.raw_text
                }
            }
            None => &self.raw_text,
        }
    }
}

/// Sections of a document, ordered by position
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentStructure {
    /// Sections sorted by start offset
    pub sections: Vec<Section>,
}

impl DocumentStructure {
    /// Sections of one semantic type, in document order
    pub fn sections_of(&self, section_type: SectionType) -> impl Iterator<Item = &Section> {
        self.sections
            .iter()
            .filter(move |s| s.section_type == section_type)
    }

    /// Number of sections carrying a header
    pub fn header_count(&self) -> usize {
        self.sections.iter().filter(|s| s.header.is_some()).count()
    }

    /// True when segmentation produced nothing
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Overall layout of a client-notes document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentType {
    /// Mostly labeled lines and headed sections
    Structured,
    /// Mix of labels, bullets and prose
    SemiStructured,
    /// Prose without labels
    Narrative,
    /// Short label-per-line brief
    Brief,
}

impl DocumentType {
    /// Kebab-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Structured => "structured",
            DocumentType::SemiStructured => "semi-structured",
            DocumentType::Narrative => "narrative",
            DocumentType::Brief => "brief",
        }
    }

    /// Parse from a kebab-case or spaced name
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace([' ', '_'], "-").as_str() {
            "structured" => Some(DocumentType::Structured),
            "semi-structured" | "semistructured" => Some(DocumentType::SemiStructured),
            "narrative" => Some(DocumentType::Narrative),
            "brief" => Some(DocumentType::Brief),
            _ => None,
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(header: Option<&str>, text: &str, section_type: SectionType) -> Section {
        Section {
            header: header.map(String::from),
            start_offset: 0,
            end_offset: text.len(),
            raw_text: text.to_string(),
            section_type,
            entities: Entities::default(),
            metadata: BTreeMap::new(),
        }
    }

    #[test]
    fn test_section_body_strips_header() {
        let s = section(Some("Competitors"), "Competitors:\n- Foo\n- Bar", SectionType::Competitor);
        assert_eq!(s.body(), "- Foo\n- Bar");

        let s = section(None, "Plain text", SectionType::Unknown);
        assert_eq!(s.body(), "Plain text");
    }

    #[test]
    fn test_sections_of() {
        let structure = DocumentStructure {
            sections: vec![
                section(None, "a", SectionType::Source),
                section(Some("B"), "B\nb", SectionType::Exclude),
                section(None, "c", SectionType::Source),
            ],
        };
        assert_eq!(structure.sections_of(SectionType::Source).count(), 2);
        assert_eq!(structure.header_count(), 1);
    }

    #[test]
    fn test_document_type_names() {
        assert_eq!(DocumentType::parse("semi structured"), Some(DocumentType::SemiStructured));
        assert_eq!(DocumentType::SemiStructured.as_str(), "semi-structured");
        assert_eq!(DocumentType::parse("poem"), None);
    }
}
