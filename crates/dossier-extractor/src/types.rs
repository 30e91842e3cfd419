//! Request and response types for parsing

use dossier_domain::{ClientProfile, Confidence, DocumentType, ParseId};
use dossier_gatekeeper::ValidationResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// File details supplied by the caller; the engine never touches the file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentMetadata {
    /// Original file name
    pub file_name: Option<String>,

    /// File size in bytes
    pub file_size: Option<u64>,

    /// Last modification time (seconds since Unix epoch)
    pub last_modified: Option<u64>,
}

impl DocumentMetadata {
    /// Metadata carrying only a file name
    pub fn named(file_name: impl Into<String>) -> Self {
        Self {
            file_name: Some(file_name.into()),
            ..Self::default()
        }
    }
}

/// Severity of a parse warning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningLevel {
    /// Something the caller must fix
    Error,
    /// Something that degraded the result
    Warning,
    /// For information only
    Info,
}

impl fmt::Display for WarningLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningLevel::Error => f.write_str("error"),
            WarningLevel::Warning => f.write_str("warning"),
            WarningLevel::Info => f.write_str("info"),
        }
    }
}

/// A warning attached to a parse result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseWarning {
    /// Severity
    pub level: WarningLevel,
    /// What happened
    pub message: String,
    /// What the author of the notes could do about it
    pub suggestion: Option<String>,
}

impl ParseWarning {
    /// Create a warning with no suggestion
    pub fn new(level: WarningLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            suggestion: None,
        }
    }

    /// Attach a suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Bookkeeping about one parse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseMetadata {
    /// Unique id of this parse
    pub parse_id: ParseId,

    /// Caller-supplied file details
    pub document: DocumentMetadata,

    /// SHA-256 of the normalized text
    pub content_hash: String,

    /// Strategies that ran, in merge order
    pub strategies_run: Vec<String>,

    /// Strategies that failed and contributed nothing
    pub strategies_failed: Vec<String>,

    /// Whether a fallback heuristic replaced the merged profile
    pub fallback_applied: bool,

    /// Name of the adopted fallback heuristic
    pub fallback_heuristic: Option<String>,

    /// Whether the result was served from the cache
    pub from_cache: bool,

    /// Number of sections found by the structure analyzer
    pub section_count: usize,

    /// Client category used for validation
    pub client_type: Option<String>,

    /// Wall-clock processing time in milliseconds
    pub processing_time_ms: u64,
}

impl ParseMetadata {
    pub(crate) fn new(document: DocumentMetadata, content_hash: String) -> Self {
        Self {
            parse_id: ParseId::new(),
            document,
            content_hash,
            strategies_run: Vec::new(),
            strategies_failed: Vec::new(),
            fallback_applied: false,
            fallback_heuristic: None,
            from_cache: false,
            section_count: 0,
            client_type: None,
            processing_time_ms: 0,
        }
    }
}

/// Result of parsing one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    /// Extracted profile, always fully initialized
    pub data: ClientProfile,

    /// Self-reported confidence
    pub confidence: Confidence,

    /// Detected layout
    pub document_type: DocumentType,

    /// Gatekeeper verdict
    pub validation: ValidationResult,

    /// Warnings in the order they were raised
    pub warnings: Vec<ParseWarning>,

    /// Parse bookkeeping
    pub metadata: ParseMetadata,
}

impl ParseResult {
    /// Warnings of one level
    pub fn warnings_at(&self, level: WarningLevel) -> impl Iterator<Item = &ParseWarning> {
        self.warnings.iter().filter(move |w| w.level == level)
    }

    /// Serialize the result to pretty JSON
    pub fn to_json(&self) -> Result<String, crate::ExtractorError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
