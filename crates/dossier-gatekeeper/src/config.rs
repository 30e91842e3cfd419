//! Gatekeeper configuration

use dossier_domain::SourceTier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Expectations for one client category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientTypeRules {
    /// A non-empty product list is required (error)
    pub require_products: bool,

    /// At least one of these tiers must hold a source (error)
    pub required_sources: Vec<SourceTier>,

    /// Competitors are expected (warning)
    pub expect_competitors: bool,

    /// Excluded topics are expected (warning)
    pub expect_excluded_topics: bool,
}

/// Configuration for validation rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Minimum client name length in characters
    pub min_client_name_length: usize,

    /// Client names longer than this are flagged as likely noise
    pub max_client_name_length: usize,

    /// Industries shorter than this are flagged
    pub min_industry_length: usize,

    /// Check that contact emails look like addresses
    pub validate_contact_emails: bool,

    /// Flag structured documents that list neither competitors nor sources
    pub validate_document_expectations: bool,

    /// Score penalty per error
    pub error_penalty: f64,

    /// Score penalty per warning
    pub warning_penalty: f64,

    /// Rules per client category (keys are lower-case)
    pub client_types: BTreeMap<String, ClientTypeRules>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_client_name_length: 2,
            max_client_name_length: 100,
            min_industry_length: 3,
            validate_contact_emails: true,
            validate_document_expectations: true,
            error_penalty: 0.2,
            warning_penalty: 0.1,
            client_types: default_client_types(),
        }
    }
}

fn default_client_types() -> BTreeMap<String, ClientTypeRules> {
    let mut rules = BTreeMap::new();
    rules.insert(
        "gaming".to_string(),
        ClientTypeRules {
            require_products: true,
            required_sources: vec![SourceTier::Tier1],
            expect_competitors: true,
            expect_excluded_topics: false,
        },
    );
    rules.insert(
        "technology".to_string(),
        ClientTypeRules {
            require_products: false,
            required_sources: Vec::new(),
            expect_competitors: true,
            expect_excluded_topics: false,
        },
    );
    rules.insert(
        "healthcare".to_string(),
        ClientTypeRules {
            require_products: false,
            required_sources: vec![SourceTier::Tier1, SourceTier::Tier2],
            expect_competitors: false,
            expect_excluded_topics: true,
        },
    );
    rules
}

impl ValidationConfig {
    /// Create a permissive configuration (general rules only)
    pub fn permissive() -> Self {
        Self {
            validate_contact_emails: false,
            validate_document_expectations: false,
            client_types: BTreeMap::new(),
            ..Self::default()
        }
    }

    /// Create a strict configuration (every expectation enforced)
    pub fn strict() -> Self {
        let mut config = Self {
            min_client_name_length: 3,
            max_client_name_length: 60,
            ..Self::default()
        };
        for rules in config.client_types.values_mut() {
            rules.expect_competitors = true;
            rules.expect_excluded_topics = true;
        }
        config
    }

    /// Rules for a client type, matched case-insensitively
    pub fn rules_for(&self, client_type: &str) -> Option<&ClientTypeRules> {
        self.client_types.get(&client_type.trim().to_lowercase())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.error_penalty) {
            return Err(format!("error_penalty {} out of range [0.0, 1.0]", self.error_penalty));
        }
        if !(0.0..=1.0).contains(&self.warning_penalty) {
            return Err(format!(
                "warning_penalty {} out of range [0.0, 1.0]",
                self.warning_penalty
            ));
        }
        if self.max_client_name_length < self.min_client_name_length {
            return Err("max_client_name_length cannot be below min_client_name_length".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ValidationConfig::default();
        assert_eq!(config.min_client_name_length, 2);
        assert_eq!(config.error_penalty, 0.2);
        assert!(config.rules_for("Gaming").unwrap().require_products);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_permissive_config() {
        let config = ValidationConfig::permissive();
        assert!(config.rules_for("gaming").is_none());
        assert!(!config.validate_contact_emails);
    }

    #[test]
    fn test_strict_config() {
        let config = ValidationConfig::strict();
        assert!(config.rules_for("technology").unwrap().expect_excluded_topics);
        assert_eq!(config.max_client_name_length, 60);
    }

    #[test]
    fn test_invalid_penalty() {
        let config = ValidationConfig {
            warning_penalty: -0.1,
            ..ValidationConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
