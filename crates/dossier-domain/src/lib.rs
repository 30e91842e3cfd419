//! Dossier Domain Layer
//!
//! Core data model for turning free-form client notes into structured
//! client profiles. Nearly dependency-free: it defines the profile, the
//! transient document structure, the confidence formula and the trait
//! boundaries that the engine and the shared stores meet at.
//!
//! ## Key Concepts
//!
//! - **ClientProfile**: The parse target, always fully initialized
//! - **DocumentStructure**: Classified sections, derived once per parse
//! - **Confidence**: Self-reported estimate, computed from field presence
//! - **SourceTier**: Four fixed priority buckets for media sources
//! - **ParseCache / PatternLearner**: Shared state, injected by handle

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod confidence;
pub mod confidence_computation;
pub mod parse_id;
pub mod profile;
pub mod structure;
pub mod tier;
pub mod traits;

// Re-exports for convenience
pub use confidence::Confidence;
pub use parse_id::ParseId;
pub use profile::{
    push_unique, BriefingInfo, ClientProfile, Competitor, CompetitorKind, Contact, Executive,
    Priority, ProfileField, SourceTiers,
};
pub use structure::{DocumentStructure, DocumentType, Entities, Section, SectionType};
pub use tier::SourceTier;
pub use traits::{CachedParse, NoopLearner, ParseCache, PatternLearner};
