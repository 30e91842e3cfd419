//! Dossier Extractor
//!
//! Turns free-form client notes into a structured [`ClientProfile`](dossier_domain::ClientProfile).
//!
//! # Overview
//!
//! Client notes arrive in every shape: tidy `Label: value` briefs, documents
//! with headed sections, bullet dumps and plain narrative. No single technique
//! reads all of them well, so the parser runs several extraction strategies
//! over the same text and keeps the best value found for each field.
//!
//! # Architecture
//!
//! ```text
//! Text → normalize → analyze → strategies → merge → confidence
//!                                                        │
//!                                   (below threshold) fallback
//!                                                        │
//!                                              Gatekeeper → ParseResult
//! ```
//!
//! - **Preprocessing**: line endings, bullets, smart quotes and blank runs
//!   are normalized before anything else looks at the text
//! - **Structure analysis**: the text is cut into typed sections with
//!   entities and inline `label: value` metadata
//! - **Strategies**: pattern, section, key-value, contextual and template
//!   extraction each produce a partial profile
//! - **Merge**: partial profiles fold together field by field; a populated
//!   field is never cleared
//! - **Fallback**: low-confidence parses get a second look from cheap
//!   heuristics, adopted only when they improve coverage
//! - **Caching and learning**: confident parses are cached by content hash
//!   and label-to-field mappings are remembered for later documents
//!
//! # Example Usage
//!
//! ```
//! use dossier_extractor::{DocumentMetadata, Parser, ParserConfig};
//!
//! let parser = Parser::in_memory(ParserConfig::default())?;
//! let result = parser.parse(
//!     "Client: Acme Corp\nIndustry: Software\nCompetitors: Foo, Bar",
//!     DocumentMetadata::named("acme.txt"),
//! );
//!
//! assert_eq!(result.data.client_name, "Acme Corp");
//! assert_eq!(result.data.competitor_names(), vec!["Foo", "Bar"]);
//! println!("confidence {:.2}", result.confidence.overall);
//! # Ok::<(), dossier_extractor::ExtractorError>(())
//! ```

#![warn(missing_docs)]

mod config;
mod document;
mod engine;
mod error;
pub mod fallback;
mod fuzzy;
mod merge;
mod preprocess;
pub mod strategies;
mod structure;
mod types;
mod values;


pub use config::ParserConfig;
pub use document::detect_document_type;
pub use engine::Parser;
pub use error::ExtractorError;
pub use fallback::{coverage_improvement, FallbackOutcome, FallbackParser};
pub use fuzzy::{similarity, FieldMatcher};
pub use merge::merge_into;
pub use preprocess::normalize;
pub use strategies::{
    default_strategies, detect_category, ClientCategory, ContextualStrategy, ExtractionStrategy,
    KeyValueStrategy, PatternStrategy, SectionStrategy, TemplateStrategy,
};
pub use structure::{classify, extract_entities, extract_metadata, StructureAnalyzer};
pub use types::{DocumentMetadata, ParseMetadata, ParseResult, ParseWarning, WarningLevel};
