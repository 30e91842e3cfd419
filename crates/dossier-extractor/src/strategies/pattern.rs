//! Direct pattern matching for the client name and industry

use super::ExtractionStrategy;
use crate::error::ExtractorError;
use crate::values::clean_value;
use dossier_domain::{ClientProfile, DocumentStructure, ProfileField};
use regex::Regex;
use std::sync::LazyLock;

/// One entry of the ordered pattern table
#[derive(Debug)]
pub struct PatternRule {
    /// Field the first capture group fills
    pub field: ProfileField,
    /// Lower runs first
    pub priority: u8,
    /// Pattern with the value in capture group 1
    pub regex: Regex,
}

fn rule(field: ProfileField, priority: u8, pattern: &str) -> PatternRule {
    PatternRule {
        field,
        priority,
        regex: Regex::new(pattern).expect("pattern rule should compile"),
    }
}

/// Pattern table, sorted by field then priority
///
/// Explicit labels come before phrasing cues, which come before positional
/// guesses.
pub static PATTERN_RULES: LazyLock<Vec<PatternRule>> = LazyLock::new(|| {
    let mut rules = vec![
        rule(
            ProfileField::ClientName,
            1,
            r"(?mi)^(?:- )?(?:client(?: name| profile)?|company(?: name)?|brand|account)[ \t]*(?::|[ \t]-[ \t])[ \t]*(\S[^\n]*?)[ \t]*$",
        ),
        rule(
            ProfileField::ClientName,
            2,
            r"\b(?i:prepared for|notes for|profile for|briefing for|notes on)[ \t]+([A-Z][\w&'.-]*(?:[ \t]+[A-Z][\w&'.-]*){0,4})",
        ),
        rule(
            ProfileField::ClientName,
            3,
            r"\b(?i:our client(?: is)?|the client is|client is)[ \t]+([A-Z][\w&'.-]*(?:[ \t]+[A-Z][\w&'.-]*){0,4})",
        ),
        rule(
            ProfileField::ClientName,
            4,
            r"(?m)\A[ \t]*([A-Z][\w&'.-]*(?:[ \t]+[A-Z][\w&'.-]*){0,4}?)[ \t]+(?:Client[ \t]+)?(?i:profile|notes|brief|briefing|overview)[ \t]*:?[ \t]*$",
        ),
        rule(
            ProfileField::Industry,
            1,
            r"(?mi)^(?:- )?(?:industry|sector|vertical|market)[ \t]*(?::|[ \t]-[ \t])[ \t]*(\S[^\n]*?)[ \t]*$",
        ),
        rule(
            ProfileField::Industry,
            2,
            r"(?i)\boperates in the[ \t]+([a-z][\w &/-]{1,40}?)[ \t]+(?:industry|sector|space|market)\b",
        ),
        rule(
            ProfileField::Industry,
            3,
            r"\bis an?[ \t]+(?:leading[ \t]+|major[ \t]+|global[ \t]+|independent[ \t]+)?((?i:[a-z][\w-]*(?:[ \t][a-z][\w-]*){0,2}?))[ \t]+(?i:company|firm|studio|publisher|developer|provider|brand|startup)\b",
        ),
    ];
    rules.sort_by_key(|r| (r.field, r.priority));
    rules
});

/// Applies [`PATTERN_RULES`] to the whole text; first match wins per field
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternStrategy;

impl PatternStrategy {
    fn first_match(text: &str, field: ProfileField) -> Option<String> {
        PATTERN_RULES
            .iter()
            .filter(|r| r.field == field)
            .find_map(|r| {
                let caps = r.regex.captures(text)?;
                let value = clean_value(caps.get(1)?.as_str());
                (!value.is_empty()).then_some(value)
            })
    }
}

impl ExtractionStrategy for PatternStrategy {
    fn name(&self) -> &'static str {
        "pattern"
    }

    fn run(
        &self,
        text: &str,
        _structure: &DocumentStructure,
    ) -> Result<ClientProfile, ExtractorError> {
        let mut profile = ClientProfile::new();
        if let Some(name) = Self::first_match(text, ProfileField::ClientName) {
            profile.client_name = name;
        }
        if let Some(industry) = Self::first_match(text, ProfileField::Industry) {
            profile.industry = industry;
        }
        Ok(profile)
    }
}
