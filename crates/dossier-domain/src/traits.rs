//! Trait definitions for shared, process-wide state
//!
//! The engine receives these by handle so callers (and tests) can inject a
//! fresh, isolated instance. Implementations live in dossier-store.

use crate::{ClientProfile, Confidence, DocumentType, ProfileField};

/// A previously computed parse, as held by a [`ParseCache`]
#[derive(Debug, Clone, PartialEq)]
pub struct CachedParse {
    /// Extracted profile
    pub profile: ClientProfile,
    /// Confidence at storage time
    pub confidence: Confidence,
    /// Detected layout
    pub document_type: DocumentType,
}

/// Memoizes parses by normalized-content hash
///
/// Implemented by the infrastructure layer (dossier-store). Writes must be
/// synchronized internally; a stale read only costs a redundant re-parse.
pub trait ParseCache: Send + Sync {
    /// Return a cached parse for this normalized text, if still valid
    fn lookup(&self, normalized_text: &str) -> Option<CachedParse>;

    /// Offer a parse for caching; implementations may decline low-confidence results
    fn store(&self, normalized_text: &str, parse: CachedParse);
}

/// Tallies label-to-field mappings that led to extracted values
///
/// Advisory only: consulted to rank candidate labels, never to supply values.
pub trait PatternLearner: Send + Sync {
    /// Record that `label` mapped to `field` and yielded `value`
    fn record_pattern(&self, field: ProfileField, label: &str, value: &str);

    /// How many times `label` has successfully mapped to `field`
    fn label_weight(&self, field: ProfileField, label: &str) -> u64;
}

/// A learner that remembers nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLearner;

impl PatternLearner for NoopLearner {
    fn record_pattern(&self, _field: ProfileField, _label: &str, _value: &str) {}

    fn label_weight(&self, _field: ProfileField, _label: &str) -> u64 {
        0
    }
}
