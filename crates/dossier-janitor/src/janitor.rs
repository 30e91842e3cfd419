//! Core Janitor implementation for cache cleanup

use crate::{JanitorConfig, JanitorError, JanitorMetrics};
use dossier_store::{current_timestamp, ProfileCache};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Removes parse-cache entries past their validity window
///
/// Lookups already ignore stale entries; the janitor reclaims the memory
/// they hold between evictions.
///
/// # Examples
///
/// ```
/// use dossier_janitor::{CacheJanitor, JanitorConfig};
/// use dossier_store::ProfileCache;
/// use std::sync::Arc;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let cache = Arc::new(ProfileCache::default_config());
/// let mut janitor = CacheJanitor::new(JanitorConfig::default())?;
///
/// let metrics = janitor.sweep(&cache);
/// println!("{}", metrics.summary());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CacheJanitor {
    config: JanitorConfig,
    metrics: JanitorMetrics,
}

impl CacheJanitor {
    /// Create a new janitor with the given configuration
    pub fn new(config: JanitorConfig) -> Result<Self, JanitorError> {
        config.validate().map_err(JanitorError::Config)?;
        Ok(Self {
            config,
            metrics: JanitorMetrics::new(),
        })
    }

    /// Create a janitor with default configuration
    pub fn default_config() -> Self {
        Self {
            config: JanitorConfig::default(),
            metrics: JanitorMetrics::new(),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &JanitorConfig {
        &self.config
    }

    /// Get a reference to the current metrics
    pub fn metrics(&self) -> &JanitorMetrics {
        &self.metrics
    }

    /// Reset metrics counters
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Sweep the cache as of now
    pub fn sweep(&mut self, cache: &Arc<ProfileCache>) -> JanitorMetrics {
        self.sweep_at(cache, current_timestamp())
    }

    /// Sweep the cache as of `now` (seconds since Unix epoch)
    ///
    /// In dry-run mode expired entries are counted but kept. Returns the
    /// updated metrics.
    pub fn sweep_at(&mut self, cache: &Arc<ProfileCache>, now: u64) -> JanitorMetrics {
        let start = Instant::now();

        let expired = if self.config.dry_run {
            let count = cache.count_expired(now);
            debug!("Dry run: {} expired cache entries would be purged", count);
            count
        } else {
            cache.purge_expired(now)
        };

        self.metrics.record_sweep(expired, self.config.dry_run, cache.len());
        self.metrics.total_runtime_ms += start.elapsed().as_millis() as u64;

        if expired > 0 && !self.config.dry_run {
            info!("Purged {} expired cache entries ({} left)", expired, cache.len());
        }
        self.metrics.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dossier_domain::{CachedParse, ClientProfile, Confidence, DocumentType};

    const DAY: u64 = 24 * 60 * 60;

    fn confident_parse() -> CachedParse {
        let mut profile = ClientProfile::new();
        profile.client_name = "Acme Corp".to_string();
        CachedParse {
            profile,
            confidence: Confidence {
                overall: 0.95,
                ..Confidence::default()
            },
            document_type: DocumentType::Brief,
        }
    }

    fn seeded_cache() -> Arc<ProfileCache> {
        let cache = Arc::new(ProfileCache::default_config());
        assert!(cache.store_at("old notes", confident_parse(), 1_000));
        assert!(cache.store_at("fresh notes", confident_parse(), 1_000 + DAY));
        cache
    }

    #[test]
    fn test_sweep_purges_expired() {
        let cache = seeded_cache();
        let mut janitor = CacheJanitor::default_config();

        let metrics = janitor.sweep_at(&cache, 1_000 + DAY + 10);
        assert_eq!(metrics.purged, 1);
        assert_eq!(metrics.last_cache_size, 1);
        assert!(!cache.contains("old notes"));
        assert!(cache.contains("fresh notes"));
    }

    #[test]
    fn test_sweep_uses_store_clock() {
        let cache = Arc::new(ProfileCache::default_config());
        assert!(cache.store_at("ancient notes", confident_parse(), 1_000));
        assert!(cache.store_at("current notes", confident_parse(), current_timestamp()));

        let metrics = CacheJanitor::default_config().sweep(&cache);
        assert_eq!(metrics.purged, 1);
        assert!(cache.contains("current notes"));
    }

    #[test]
    fn test_dry_run_keeps_entries() {
        let cache = seeded_cache();
        let config = JanitorConfig {
            dry_run: true,
            ..Default::default()
        };
        let mut janitor = CacheJanitor::new(config).unwrap();

        let metrics = janitor.sweep_at(&cache, 1_000 + DAY + 10);
        assert_eq!(metrics.purged, 0);
        assert_eq!(metrics.would_purge, 1);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_nothing_expired() {
        let cache = seeded_cache();
        let mut janitor = CacheJanitor::default_config();

        let metrics = janitor.sweep_at(&cache, 1_000 + 10);
        assert_eq!(metrics.purged, 0);
        assert_eq!(metrics.sweep_count, 1);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_metrics_accumulate_and_reset() {
        let cache = seeded_cache();
        let mut janitor = CacheJanitor::default_config();
        janitor.sweep_at(&cache, 1_000 + DAY + 10);
        janitor.sweep_at(&cache, 1_000 + 3 * DAY);
        assert_eq!(janitor.metrics().purged, 2);
        assert_eq!(janitor.metrics().sweep_count, 2);

        janitor.reset_metrics();
        assert_eq!(janitor.metrics().sweep_count, 0);
    }

    #[test]
    fn test_invalid_config() {
        let config = JanitorConfig {
            sweep_interval_minutes: 0,
            ..Default::default()
        };
        assert!(matches!(CacheJanitor::new(config), Err(JanitorError::Config(_))));
    }
}
