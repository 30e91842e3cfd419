//! Dossier Janitor
//!
//! Background maintenance for the shared parse cache.
//!
//! # Overview
//!
//! Cache lookups already refuse entries older than the validity window, but
//! those entries keep their memory until eviction reaches them. The janitor
//! purges them on a schedule:
//! - **Expiry sweeps**: remove every entry past the cache's TTL
//! - **Dry runs**: count what would be removed without touching the cache
//! - **Metrics collection**: track purges across sweeps
//!
//! # Usage
//!
//! ## One-time Sweep
//!
//! ```
//! use dossier_janitor::CacheJanitor;
//! use dossier_store::ProfileCache;
//! use std::sync::Arc;
//!
//! let cache = Arc::new(ProfileCache::default_config());
//! let mut janitor = CacheJanitor::default_config();
//!
//! let metrics = janitor.sweep(&cache);
//! assert_eq!(metrics.sweep_count, 1);
//! ```
//!
//! ## Background Worker
//!
//! ```no_run
//! use dossier_janitor::{JanitorConfig, JanitorWorker};
//! use dossier_store::ProfileCache;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cache = Arc::new(ProfileCache::default_config());
//!     let mut worker = JanitorWorker::new(JanitorConfig::default())?;
//!     worker.run(cache).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [janitor]
//! sweep_interval_minutes = 60
//! dry_run = false
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod janitor;
mod metrics;
mod worker;

pub use config::JanitorConfig;
pub use error::JanitorError;
pub use janitor::CacheJanitor;
pub use metrics::JanitorMetrics;
pub use worker::JanitorWorker;
