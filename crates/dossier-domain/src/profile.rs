//! Profile module - the parse target
//!
//! A [`ClientProfile`] is always fully initialized: every field exists even
//! when nothing was extracted for it. List fields keep insertion order and
//! are deduplicated by exact (case-sensitive) string equality.

use crate::SourceTier;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Push `value` onto `list` unless an identical string is already present
///
/// Returns true when the value was added. Blank values are ignored.
pub fn push_unique(list: &mut Vec<String>, value: impl Into<String>) -> bool {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.is_empty() || list.iter().any(|v| v == trimmed) {
        return false;
    }
    list.push(trimmed.to_string());
    true
}

/// Structured client profile extracted from a client-notes document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientProfile {
    /// Client or brand name
    pub client_name: String,

    /// Industry or sector
    pub industry: String,

    /// Games or products, in document order
    #[serde(alias = "games")]
    pub products: Vec<String>,

    /// Executives to monitor
    pub executives: Vec<Executive>,

    /// Competitors to track
    pub competitors: Vec<Competitor>,

    /// Topics to leave out of briefings
    pub excluded_topics: Vec<String>,

    /// Media sources bucketed by tier
    pub sources: SourceTiers,

    /// Delivery details for the briefing
    #[serde(alias = "briefingInfo")]
    pub briefing: BriefingInfo,

    /// Client-side contacts
    pub contacts: Vec<Contact>,
}

/// An executive whose coverage is monitored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Executive {
    /// Full name
    pub name: String,
    /// Title or role
    pub role: String,
    /// How coverage sentiment should be handled (e.g. "positive only")
    pub sentiment_policy: String,
}

/// Competitive relationship to the client
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompetitorKind {
    /// Competes for the same customers
    #[default]
    Direct,
    /// Adjacent market or partial overlap
    Indirect,
}

/// Monitoring priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Checked every cycle
    High,
    /// Checked regularly
    #[default]
    Medium,
    /// Checked when time allows
    Low,
}

/// A competitor of the client
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Competitor {
    /// Company name
    pub name: String,
    /// Direct or indirect competitor
    #[serde(rename = "type")]
    pub kind: CompetitorKind,
    /// Monitoring priority
    pub priority: Priority,
}

impl Competitor {
    /// Create a competitor with the given kind and priority
    pub fn new(name: impl Into<String>, kind: CompetitorKind, priority: Priority) -> Self {
        Self {
            name: name.into(),
            kind,
            priority,
        }
    }
}

/// A client-side contact
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    /// Contact name
    pub name: String,
    /// Email address
    pub email: String,
    /// Role at the client
    pub role: String,
}

/// When, for whom and how often the briefing is delivered
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BriefingInfo {
    /// Delivery schedule, e.g. "7:00 AM EST"
    pub schedule: String,
    /// Who reads the briefing
    pub audience: String,
    /// Length or frequency, e.g. "daily, 2 pages"
    pub frequency: String,
}

impl BriefingInfo {
    /// Number of populated keys
    pub fn populated_keys(&self) -> usize {
        [&self.schedule, &self.audience, &self.frequency]
            .iter()
            .filter(|v| !v.trim().is_empty())
            .count()
    }

    /// True when no key is populated
    pub fn is_empty(&self) -> bool {
        self.populated_keys() == 0
    }
}

/// Media sources in four fixed tiers
///
/// Insertion order within a tier is its priority order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SourceTiers {
    /// Must-read outlets
    pub tier1: Vec<String>,
    /// Regular coverage
    pub tier2: Vec<String>,
    /// Long tail
    pub tier3: Vec<String>,
    /// Manually searched
    pub hand_search: Vec<String>,
}

impl SourceTiers {
    /// Sources in the given tier
    pub fn get(&self, tier: SourceTier) -> &[String] {
        match tier {
            SourceTier::Tier1 => &self.tier1,
            SourceTier::Tier2 => &self.tier2,
            SourceTier::Tier3 => &self.tier3,
            SourceTier::HandSearch => &self.hand_search,
        }
    }

    /// Mutable sources in the given tier
    pub fn get_mut(&mut self, tier: SourceTier) -> &mut Vec<String> {
        match tier {
            SourceTier::Tier1 => &mut self.tier1,
            SourceTier::Tier2 => &mut self.tier2,
            SourceTier::Tier3 => &mut self.tier3,
            SourceTier::HandSearch => &mut self.hand_search,
        }
    }

    /// Add a source to a tier (exact-match dedup within the tier)
    pub fn push(&mut self, tier: SourceTier, source: impl Into<String>) -> bool {
        push_unique(self.get_mut(tier), source)
    }

    /// Number of tiers with at least one source
    pub fn populated_tiers(&self) -> usize {
        SourceTier::ALL
            .iter()
            .filter(|t| !self.get(**t).is_empty())
            .count()
    }

    /// Total sources across all tiers
    pub fn total(&self) -> usize {
        SourceTier::ALL.iter().map(|t| self.get(*t).len()).sum()
    }

    /// True when every tier is empty
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Names of the profile's top-level fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProfileField {
    /// `clientName`
    ClientName,
    /// `industry`
    Industry,
    /// `products` (a.k.a. games)
    Products,
    /// `executives`
    Executives,
    /// `competitors`
    Competitors,
    /// `excludedTopics`
    ExcludedTopics,
    /// `sources`
    Sources,
    /// `briefing`
    Briefing,
    /// `contacts`
    Contacts,
}

impl ProfileField {
    /// Every field, in profile order
    pub const ALL: [ProfileField; 9] = [
        ProfileField::ClientName,
        ProfileField::Industry,
        ProfileField::Products,
        ProfileField::Executives,
        ProfileField::Competitors,
        ProfileField::ExcludedTopics,
        ProfileField::Sources,
        ProfileField::Briefing,
        ProfileField::Contacts,
    ];

    /// Canonical camelCase name
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileField::ClientName => "clientName",
            ProfileField::Industry => "industry",
            ProfileField::Products => "products",
            ProfileField::Executives => "executives",
            ProfileField::Competitors => "competitors",
            ProfileField::ExcludedTopics => "excludedTopics",
            ProfileField::Sources => "sources",
            ProfileField::Briefing => "briefing",
            ProfileField::Contacts => "contacts",
        }
    }

    /// Parse a field name; accepts camelCase, snake_case and a few aliases
    pub fn parse(s: &str) -> Option<Self> {
        let compact: String = s
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();

        match compact.as_str() {
            "clientname" | "client" => Some(ProfileField::ClientName),
            "industry" => Some(ProfileField::Industry),
            "products" | "games" | "gamesproducts" => Some(ProfileField::Products),
            "executives" => Some(ProfileField::Executives),
            "competitors" => Some(ProfileField::Competitors),
            "excludedtopics" | "exclusions" => Some(ProfileField::ExcludedTopics),
            "sources" => Some(ProfileField::Sources),
            "briefing" | "briefinginfo" | "schedule" => Some(ProfileField::Briefing),
            "contacts" => Some(ProfileField::Contacts),
            _ => None,
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ClientProfile {
    /// Create an empty profile
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a field holds any value
    pub fn is_populated(&self, field: ProfileField) -> bool {
        self.field_size(field) > 0
    }

    /// Size of a field: 1/0 for strings, item count for lists, total
    /// sources for the tiers and populated keys for the briefing
    pub fn field_size(&self, field: ProfileField) -> usize {
        match field {
            ProfileField::ClientName => usize::from(!self.client_name.trim().is_empty()),
            ProfileField::Industry => usize::from(!self.industry.trim().is_empty()),
            ProfileField::Products => self.products.len(),
            ProfileField::Executives => self.executives.len(),
            ProfileField::Competitors => self.competitors.len(),
            ProfileField::ExcludedTopics => self.excluded_topics.len(),
            ProfileField::Sources => self.sources.total(),
            ProfileField::Briefing => self.briefing.populated_keys(),
            ProfileField::Contacts => self.contacts.len(),
        }
    }

    /// Number of populated top-level fields
    pub fn populated_fields(&self) -> usize {
        ProfileField::ALL
            .iter()
            .filter(|f| self.is_populated(**f))
            .count()
    }

    /// True when nothing was extracted
    pub fn is_empty(&self) -> bool {
        self.populated_fields() == 0
    }

    /// Add a product (exact-match dedup)
    pub fn add_product(&mut self, product: impl Into<String>) -> bool {
        push_unique(&mut self.products, product)
    }

    /// Add an excluded topic (exact-match dedup)
    pub fn add_excluded_topic(&mut self, topic: impl Into<String>) -> bool {
        push_unique(&mut self.excluded_topics, topic)
    }

    /// Add a competitor unless one with the same exact name exists
    pub fn add_competitor(&mut self, competitor: Competitor) -> bool {
        let name = competitor.name.trim();
        if name.is_empty() || self.competitors.iter().any(|c| c.name == name) {
            return false;
        }
        self.competitors.push(Competitor {
            name: name.to_string(),
            ..competitor
        });
        true
    }

    /// Add an executive unless one with the same exact name exists
    pub fn add_executive(&mut self, executive: Executive) -> bool {
        let name = executive.name.trim();
        if name.is_empty() || self.executives.iter().any(|e| e.name == name) {
            return false;
        }
        self.executives.push(Executive {
            name: name.to_string(),
            ..executive
        });
        true
    }

    /// Add a contact unless one with the same name and email exists
    pub fn add_contact(&mut self, contact: Contact) -> bool {
        if contact.name.trim().is_empty() && contact.email.trim().is_empty() {
            return false;
        }
        if self
            .contacts
            .iter()
            .any(|c| c.name == contact.name && c.email == contact.email)
        {
            return false;
        }
        self.contacts.push(contact);
        true
    }

    /// Names of all competitors, in order
    pub fn competitor_names(&self) -> Vec<&str> {
        self.competitors.iter().map(|c| c.name.as_str()).collect()
    }
}
