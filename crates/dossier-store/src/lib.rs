//! Dossier Storage Layer
//!
//! Process-wide, in-memory state shared by concurrent parses:
//!
//! - [`ProfileCache`]: memoizes parses by normalized-content hash, with a
//!   validity window, a confidence floor and bounded batch eviction
//! - [`LearningStore`]: tallies which labels mapped to which fields, to
//!   rank candidate labels on future documents
//!
//! Both use interior synchronization (one lock each), so a single instance
//! can be shared behind an `Arc` by every worker thread. Nothing is
//! persisted; state resets when the process restarts.
//!
//! # Examples
//!
//! ```
//! use dossier_store::{CacheConfig, ProfileCache};
//!
//! let cache = ProfileCache::new(CacheConfig::default()).unwrap();
//! assert!(cache.is_empty());
//! ```

#![warn(missing_docs)]

mod cache;
mod learning;

pub use cache::{content_hash, CacheConfig, CacheEntry, ProfileCache};
pub use learning::{LearnedPattern, LearningStore};

use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Errors that can occur when building a store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Invalid store configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Current timestamp in seconds since Unix epoch
pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
