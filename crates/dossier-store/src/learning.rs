//! Learning store for label-to-field mappings

use crate::current_timestamp;
use dossier_domain::{PatternLearner, ProfileField};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::trace;

/// A label that has successfully mapped to a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnedPattern {
    /// Target field
    pub field: ProfileField,
    /// Label text as first seen
    pub label_text: String,
    /// Successful mappings so far
    pub occurrence_count: u64,
    /// First success (seconds since Unix epoch)
    pub first_seen: u64,
    /// Latest success (seconds since Unix epoch)
    pub last_seen: u64,
}

/// Canonical lookup key for a label: lower-cased, whitespace collapsed
fn label_key(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Append-only tally of learned patterns
///
/// Entries grow monotonically and are never deleted.
#[derive(Default)]
pub struct LearningStore {
    patterns: RwLock<HashMap<(ProfileField, String), LearnedPattern>>,
}

impl LearningStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful mapping as of `now`
    pub fn record_pattern_at(&self, field: ProfileField, label: &str, value: &str, now: u64) {
        let key = label_key(label);
        if key.is_empty() || value.trim().is_empty() {
            return;
        }

        let mut patterns = self.patterns.write();
        let pattern = patterns
            .entry((field, key))
            .or_insert_with(|| LearnedPattern {
                field,
                label_text: label.trim().to_string(),
                occurrence_count: 0,
                first_seen: now,
                last_seen: now,
            });
        pattern.occurrence_count += 1;
        pattern.last_seen = pattern.last_seen.max(now);
        trace!(
            "Learned '{}' -> {} ({} times)",
            pattern.label_text,
            field,
            pattern.occurrence_count
        );
    }

    /// Patterns for one field, most frequent first
    pub fn patterns_for(&self, field: ProfileField) -> Vec<LearnedPattern> {
        let mut found: Vec<LearnedPattern> = self
            .patterns
            .read()
            .values()
            .filter(|p| p.field == field)
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            b.occurrence_count
                .cmp(&a.occurrence_count)
                .then_with(|| a.label_text.cmp(&b.label_text))
        });
        found
    }

    /// Number of distinct (field, label) pairs
    pub fn len(&self) -> usize {
        self.patterns.read().len()
    }

    /// True when nothing has been learned
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PatternLearner for LearningStore {
    fn record_pattern(&self, field: ProfileField, label: &str, value: &str) {
        self.record_pattern_at(field, label, value, current_timestamp());
    }

    fn label_weight(&self, field: ProfileField, label: &str) -> u64 {
        self.patterns
            .read()
            .get(&(field, label_key(label)))
            .map(|p| p.occurrence_count)
            .unwrap_or(0)
    }
}
