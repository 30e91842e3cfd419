//! Metrics collection for Janitor operations

/// Metrics collected across sweeps
///
/// Tracks entries purged (or, in dry-run mode, found expired) and the
/// cache size seen after the latest sweep.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JanitorMetrics {
    /// Expired entries removed
    pub purged: usize,

    /// Expired entries found but kept because of dry-run mode
    pub would_purge: usize,

    /// Entries left in the cache after the latest sweep
    pub last_cache_size: usize,

    /// Total sweep iterations completed
    pub sweep_count: usize,

    /// Total runtime in milliseconds
    pub total_runtime_ms: u64,
}

impl JanitorMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed sweep
    pub fn record_sweep(&mut self, expired: usize, dry_run: bool, cache_size: usize) {
        if dry_run {
            self.would_purge += expired;
        } else {
            self.purged += expired;
        }
        self.last_cache_size = cache_size;
        self.sweep_count += 1;
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Janitor Metrics Summary".to_string(),
            "======================".to_string(),
            format!("Sweep cycles: {}", self.sweep_count),
            format!("Total runtime: {}ms", self.total_runtime_ms),
            format!("Purged: {}", self.purged),
        ];
        if self.would_purge > 0 {
            lines.push(format!("Would purge (dry run): {}", self.would_purge));
        }
        lines.push(format!("Cache size: {}", self.last_cache_size));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = JanitorMetrics::new();
        assert_eq!(metrics.purged, 0);
        assert_eq!(metrics.sweep_count, 0);
    }

    #[test]
    fn test_record_sweep() {
        let mut metrics = JanitorMetrics::new();
        metrics.record_sweep(3, false, 7);
        metrics.record_sweep(2, true, 7);
        metrics.record_sweep(1, false, 6);

        assert_eq!(metrics.purged, 4);
        assert_eq!(metrics.would_purge, 2);
        assert_eq!(metrics.last_cache_size, 6);
        assert_eq!(metrics.sweep_count, 3);
    }

    #[test]
    fn test_reset() {
        let mut metrics = JanitorMetrics::new();
        metrics.record_sweep(10, false, 0);
        metrics.total_runtime_ms = 5;
        metrics.reset();
        assert_eq!(metrics, JanitorMetrics::default());
    }

    #[test]
    fn test_summary() {
        let mut metrics = JanitorMetrics::new();
        metrics.record_sweep(5, false, 12);
        metrics.total_runtime_ms = 120;

        let summary = metrics.summary();
        assert!(summary.contains("Sweep cycles: 1"));
        assert!(summary.contains("Total runtime: 120ms"));
        assert!(summary.contains("Purged: 5"));
        assert!(summary.contains("Cache size: 12"));
        assert!(!summary.contains("dry run"));
    }
}
