//! Dossier Gatekeeper
//!
//! Validates extracted client profiles before they are handed to callers.
//!
//! The Gatekeeper provides:
//! - General rules (client name required, plausible industry, well-formed contacts)
//! - Client-type rules (required products, required source tiers, competitors)
//! - Document-type expectations
//! - Quality scoring with itemized, remediable issues
//!
//! Validation never fails: problems are reported, not raised.
//!
//! # Examples
//!
//! ```
//! use dossier_domain::{ClientProfile, DocumentType};
//! use dossier_gatekeeper::Gatekeeper;
//!
//! let gatekeeper = Gatekeeper::default_config();
//! let mut profile = ClientProfile::new();
//! profile.client_name = "Acme Corp".to_string();
//!
//! let result = gatekeeper.validate(&profile, DocumentType::Narrative, None);
//! assert!(result.is_valid);
//! ```

#![warn(missing_docs)]

mod validator;
mod error;
mod config;

pub use validator::{Gatekeeper, ValidationResult, ValidationIssue, Severity};
pub use error::GatekeeperError;
pub use config::{ValidationConfig, ClientTypeRules};
