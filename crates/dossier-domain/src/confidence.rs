//! Confidence module - self-reported extraction certainty

use crate::ProfileField;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Heuristic estimate of extraction correctness
///
/// Confidence is always computed from profile content, never asserted by
/// the strategy that produced a value. Every score is in [0.0, 1.0].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Confidence {
    /// Weighted overall score [0.0, 1.0]
    pub overall: f64,
    /// Score per scored field [0.0, 1.0]
    pub per_field: BTreeMap<ProfileField, f64>,
}

impl Confidence {
    /// Zero confidence with no field scores
    pub fn zero() -> Self {
        Self::default()
    }

    /// Score for a single field (0.0 when unscored)
    pub fn field(&self, field: ProfileField) -> f64 {
        self.per_field.get(&field).copied().unwrap_or(0.0)
    }

    /// Whether the overall score clears a threshold
    pub fn meets(&self, threshold: f64) -> bool {
        self.overall >= threshold
    }
}
