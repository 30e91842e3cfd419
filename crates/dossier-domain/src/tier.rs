//! Tier module - priority buckets for media sources

use serde::{Deserialize, Serialize};

/// Source tier in a client's media monitoring plan
///
/// Tiers rank sources by authority and check frequency:
/// - Tier1: Must-read outlets, checked first
/// - Tier2: Regular coverage
/// - Tier3: Long tail, checked when time allows
/// - HandSearch: Sources without feeds that are searched manually
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceTier {
    /// Highest-priority outlets
    Tier1,

    /// Regular coverage outlets
    Tier2,

    /// Long-tail outlets
    Tier3,

    /// Manually searched sources
    HandSearch,
}

impl SourceTier {
    /// All tiers in priority order
    pub const ALL: [SourceTier; 4] = [
        SourceTier::Tier1,
        SourceTier::Tier2,
        SourceTier::Tier3,
        SourceTier::HandSearch,
    ];

    /// Get the tier name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTier::Tier1 => "tier1",
            SourceTier::Tier2 => "tier2",
            SourceTier::Tier3 => "tier3",
            SourceTier::HandSearch => "handSearch",
        }
    }

    /// Parse a tier from a document label such as "Tier 1", "tier-2",
    /// "Tier Three" or "Hand search"
    pub fn parse(s: &str) -> Option<Self> {
        let compact: String = s
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();

        match compact.as_str() {
            "tier1" | "t1" | "tierone" | "tieri" => Some(SourceTier::Tier1),
            "tier2" | "t2" | "tiertwo" | "tierii" => Some(SourceTier::Tier2),
            "tier3" | "t3" | "tierthree" | "tieriii" => Some(SourceTier::Tier3),
            "handsearch" | "handsearches" | "manualsearch" | "handsearched" => {
                Some(SourceTier::HandSearch)
            }
            _ => None,
        }
    }
}

impl std::str::FromStr for SourceTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid source tier: {}", s))
    }
}

impl std::fmt::Display for SourceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_label_variants() {
        assert_eq!(SourceTier::parse("Tier 1"), Some(SourceTier::Tier1));
        assert_eq!(SourceTier::parse("tier-2"), Some(SourceTier::Tier2));
        assert_eq!(SourceTier::parse("Tier Three"), Some(SourceTier::Tier3));
        assert_eq!(SourceTier::parse("Hand search"), Some(SourceTier::HandSearch));
        assert_eq!(SourceTier::parse("handSearch"), Some(SourceTier::HandSearch));
        assert_eq!(SourceTier::parse("Sources"), None);
    }

    #[test]
    fn test_round_trip_names() {
        for tier in SourceTier::ALL {
            assert_eq!(SourceTier::parse(tier.as_str()), Some(tier));
        }
    }
}
