//! Profile validation logic

use crate::{GatekeeperError, ValidationConfig};
use dossier_domain::{ClientProfile, DocumentType, ProfileField};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How serious a validation issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The profile is unusable until fixed
    Error,
    /// The profile is usable but probably incomplete
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// One problem found in a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    /// Field the issue concerns, if any
    pub field: Option<ProfileField>,
    /// Error or warning
    pub severity: Severity,
    /// What is wrong
    pub message: String,
    /// How to fix it
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    fn error(field: ProfileField, message: impl Into<String>, suggestion: &str) -> Self {
        Self {
            field: Some(field),
            severity: Severity::Error,
            message: message.into(),
            suggestion: Some(suggestion.to_string()),
        }
    }

    fn warning(field: Option<ProfileField>, message: impl Into<String>, suggestion: &str) -> Self {
        Self {
            field,
            severity: Severity::Warning,
            message: message.into(),
            suggestion: Some(suggestion.to_string()),
        }
    }
}

/// Result of profile validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// True when no error-severity issue was found
    pub is_valid: bool,

    /// Issues in rule order
    pub issues: Vec<ValidationIssue>,

    /// Quality score (0.0-1.0)
    pub score: f64,
}

impl ValidationResult {
    /// Issues of error severity
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    /// Issues of warning severity
    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }
}

/// The Gatekeeper validates profiles before they are returned
pub struct Gatekeeper {
    config: ValidationConfig,
}

impl Gatekeeper {
    /// Create a new Gatekeeper with the given configuration
    pub fn new(config: ValidationConfig) -> Result<Self, GatekeeperError> {
        config.validate().map_err(GatekeeperError::Config)?;
        Ok(Self { config })
    }

    /// Create a Gatekeeper with default configuration
    pub fn default_config() -> Self {
        Self {
            config: ValidationConfig::default(),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate a profile against the general, document-type and
    /// client-type rules
    ///
    /// # Arguments
    ///
    /// * `profile` - The extracted profile
    /// * `document_type` - Layout of the source document
    /// * `client_type` - Client category (e.g. "gaming"), if known
    pub fn validate(
        &self,
        profile: &ClientProfile,
        document_type: DocumentType,
        client_type: Option<&str>,
    ) -> ValidationResult {
        let mut issues = Vec::new();

        self.check_general(profile, &mut issues);
        if self.config.validate_document_expectations {
            self.check_document_type(profile, document_type, &mut issues);
        }
        if let Some(client_type) = client_type {
            self.check_client_type(profile, client_type, &mut issues);
        }

        let errors = issues.iter().filter(|i| i.severity == Severity::Error).count();
        let warnings = issues.len() - errors;
        let score = (1.0
            - self.config.error_penalty * errors as f64
            - self.config.warning_penalty * warnings as f64)
            .max(0.0);

        ValidationResult {
            is_valid: errors == 0,
            issues,
            score,
        }
    }

    fn check_general(&self, profile: &ClientProfile, issues: &mut Vec<ValidationIssue>) {
        let name = profile.client_name.trim();
        let name_len = name.chars().count();
        if name.is_empty() {
            issues.push(ValidationIssue::error(
                ProfileField::ClientName,
                "Client name is missing",
                "Add a line such as 'Client: <name>' near the top of the notes",
            ));
        } else if name_len < self.config.min_client_name_length {
            issues.push(ValidationIssue::error(
                ProfileField::ClientName,
                format!("Client name '{}' is too short", name),
                "Spell out the full client name",
            ));
        } else if name_len > self.config.max_client_name_length {
            issues.push(ValidationIssue::warning(
                Some(ProfileField::ClientName),
                format!("Client name is {} characters long", name_len),
                "Check that the client line does not run into the next sentence",
            ));
        }

        let industry = profile.industry.trim();
        if !industry.is_empty() && industry.chars().count() < self.config.min_industry_length {
            issues.push(ValidationIssue::warning(
                Some(ProfileField::Industry),
                format!("Industry '{}' looks truncated", industry),
                "Use a descriptive industry such as 'Video Games'",
            ));
        }

        if self.config.validate_contact_emails {
            for contact in &profile.contacts {
                let email = contact.email.trim();
                if !email.is_empty() && !looks_like_email(email) {
                    issues.push(ValidationIssue::warning(
                        Some(ProfileField::Contacts),
                        format!("Contact email '{}' is not a valid address", email),
                        "Use the form name@example.com",
                    ));
                }
            }
        }
    }

    fn check_document_type(
        &self,
        profile: &ClientProfile,
        document_type: DocumentType,
        issues: &mut Vec<ValidationIssue>,
    ) {
        let expects_lists = matches!(document_type, DocumentType::Structured | DocumentType::Brief);
        if expects_lists && profile.competitors.is_empty() && profile.sources.is_empty() {
            issues.push(ValidationIssue::warning(
                None,
                format!(
                    "A {} document yielded neither competitors nor sources",
                    document_type
                ),
                "Check the labels used for the competitor and source sections",
            ));
        }
    }

    fn check_client_type(
        &self,
        profile: &ClientProfile,
        client_type: &str,
        issues: &mut Vec<ValidationIssue>,
    ) {
        let Some(rules) = self.config.rules_for(client_type) else {
            return;
        };

        if rules.require_products && profile.products.is_empty() {
            issues.push(ValidationIssue::error(
                ProfileField::Products,
                format!("{} clients must list products", client_type),
                "Add a 'Games:' or 'Products:' section",
            ));
        }

        if !rules.required_sources.is_empty()
            && rules
                .required_sources
                .iter()
                .all(|tier| profile.sources.get(*tier).is_empty())
        {
            let tiers: Vec<&str> = rules.required_sources.iter().map(|t| t.as_str()).collect();
            issues.push(ValidationIssue::error(
                ProfileField::Sources,
                format!(
                    "{} clients need sources in {}",
                    client_type,
                    tiers.join(" or ")
                ),
                "Label the must-read outlets as 'Tier 1:'",
            ));
        }

        if rules.expect_competitors && profile.competitors.is_empty() {
            issues.push(ValidationIssue::warning(
                Some(ProfileField::Competitors),
                format!("No competitors listed for a {} client", client_type),
                "Add a 'Competitors:' section",
            ));
        }

        if rules.expect_excluded_topics && profile.excluded_topics.is_empty() {
            issues.push(ValidationIssue::warning(
                Some(ProfileField::ExcludedTopics),
                format!("No excluded topics listed for a {} client", client_type),
                "Add an 'Exclude:' section",
            ));
        }
    }
}

/// Minimal shape check: one '@', non-empty local part, dotted domain
fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.contains(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(head, tail)| !head.is_empty() && !tail.is_empty() && !tail.ends_with('.'))
}
