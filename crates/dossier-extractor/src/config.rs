//! Configuration for the Parser

use dossier_domain::ProfileField;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Configuration for the Parser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Map labels to fields by edit distance, not just exact synonyms
    pub enable_fuzzy_matching: bool,

    /// Overall confidence below which the fallback heuristics run
    pub confidence_threshold: f64,

    /// Serve and store results through the parse cache
    pub enable_caching: bool,

    /// Client category used for validation; detected from content when unset
    pub client_type: Option<String>,

    /// Extra label synonyms per field name (e.g. "competitors" -> ["rivals"])
    pub custom_patterns: BTreeMap<String, Vec<String>>,

    /// Similarity a label must exceed to map onto a field
    pub fuzzy_threshold: f64,

    /// String values longer than this never win a merge
    pub max_value_length: usize,

    /// Fragments this short or shorter are treated as noise
    pub min_fragment_length: usize,

    /// Share of template markers that must be present for a template to apply
    pub template_match_ratio: f64,

    /// Run the fallback heuristics on low-confidence parses
    pub enable_fallback: bool,

    /// Upper bound for `parse_with_timeout` callers that use the configured value
    pub parse_timeout_secs: u64,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            enable_fuzzy_matching: true,
            confidence_threshold: 0.6,
            enable_caching: true,
            client_type: None,
            custom_patterns: BTreeMap::new(),
            fuzzy_threshold: 0.7,
            max_value_length: 100,
            min_fragment_length: 20,
            template_match_ratio: 0.6,
            enable_fallback: true,
            parse_timeout_secs: 30,
        }
    }
}

impl ParserConfig {
    /// Strict preset: exact labels only, higher bar before fallback is skipped
    pub fn strict() -> Self {
        Self {
            enable_fuzzy_matching: false,
            confidence_threshold: 0.8,
            fuzzy_threshold: 0.85,
            template_match_ratio: 0.8,
            parse_timeout_secs: 10,
            ..Self::default()
        }
    }

    /// Lenient preset: looser label matching, fallback only on very weak parses
    pub fn lenient() -> Self {
        Self {
            confidence_threshold: 0.4,
            fuzzy_threshold: 0.6,
            max_value_length: 150,
            min_fragment_length: 10,
            template_match_ratio: 0.5,
            parse_timeout_secs: 60,
            ..Self::default()
        }
    }

    /// Get the parse timeout as a Duration
    pub fn parse_timeout(&self) -> Duration {
        Duration::from_secs(self.parse_timeout_secs)
    }

    /// Custom synonyms resolved to their fields
    ///
    /// Unknown field names are skipped here; `validate` rejects them.
    pub fn custom_synonyms(&self) -> Vec<(ProfileField, String)> {
        self.custom_patterns
            .iter()
            .filter_map(|(name, labels)| ProfileField::parse(name).map(|f| (f, labels)))
            .flat_map(|(field, labels)| {
                labels
                    .iter()
                    .map(move |label| (field, label.trim().to_lowercase()))
            })
            .filter(|(_, label)| !label.is_empty())
            .collect()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(format!(
                "confidence_threshold {} out of range [0.0, 1.0]",
                self.confidence_threshold
            ));
        }
        if !(0.0..=1.0).contains(&self.fuzzy_threshold) {
            return Err(format!(
                "fuzzy_threshold {} out of range [0.0, 1.0]",
                self.fuzzy_threshold
            ));
        }
        if !(self.template_match_ratio > 0.0 && self.template_match_ratio <= 1.0) {
            return Err(format!(
                "template_match_ratio {} out of range (0.0, 1.0]",
                self.template_match_ratio
            ));
        }
        if self.max_value_length == 0 {
            return Err("max_value_length must be greater than 0".to_string());
        }
        if self.parse_timeout_secs == 0 {
            return Err("parse_timeout_secs must be greater than 0".to_string());
        }
        for (name, labels) in &self.custom_patterns {
            if ProfileField::parse(name).is_none() {
                return Err(format!("custom_patterns: unknown field '{}'", name));
            }
            if labels.iter().all(|l| l.trim().is_empty()) {
                return Err(format!("custom_patterns: no synonyms given for '{}'", name));
            }
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ParserConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.confidence_threshold, 0.6);
        assert_eq!(config.fuzzy_threshold, 0.7);
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(ParserConfig::strict().validate().is_ok());
        assert!(ParserConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_invalid_threshold() {
        let config = ParserConfig {
            confidence_threshold: 1.5,
            ..ParserConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_custom_field() {
        let mut config = ParserConfig::default();
        config
            .custom_patterns
            .insert("weather".to_string(), vec!["forecast".to_string()]);
        assert!(config.validate().unwrap_err().contains("weather"));
    }

    #[test]
    fn test_custom_synonyms() {
        let mut config = ParserConfig::default();
        config.custom_patterns.insert(
            "competitors".to_string(),
            vec!["Rivals ".to_string(), " ".to_string()],
        );
        assert_eq!(
            config.custom_synonyms(),
            vec![(ProfileField::Competitors, "rivals".to_string())]
        );
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = ParserConfig::lenient();
        config.client_type = Some("gaming".to_string());
        config
            .custom_patterns
            .insert("industry".to_string(), vec!["vertical".to_string()]);

        let toml_str = config.to_toml().unwrap();
        let parsed = ParserConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = ParserConfig::from_toml("confidence_threshold = 0.5\n").unwrap();
        assert_eq!(parsed.confidence_threshold, 0.5);
        assert!(parsed.enable_caching);
    }
}
