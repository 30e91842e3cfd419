//! Background worker for continuous Janitor operation

use crate::{CacheJanitor, JanitorConfig, JanitorError, JanitorMetrics};
use dossier_store::ProfileCache;
use std::sync::Arc;
use tokio::time::{interval, Duration};

/// Background worker that runs the janitor on a schedule
///
/// # Examples
///
/// ```no_run
/// use dossier_janitor::{JanitorConfig, JanitorWorker};
/// use dossier_store::ProfileCache;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let cache = Arc::new(ProfileCache::default_config());
///     let mut worker = JanitorWorker::new(JanitorConfig::default())?;
///
///     // Run indefinitely (until Ctrl+C)
///     worker.run(cache).await?;
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct JanitorWorker {
    janitor: CacheJanitor,
    interval: Duration,
}

impl JanitorWorker {
    /// Create a new background worker with the given configuration
    pub fn new(config: JanitorConfig) -> Result<Self, JanitorError> {
        let interval = config.sweep_interval();
        Ok(Self {
            janitor: CacheJanitor::new(config)?,
            interval,
        })
    }

    /// Create a worker with default configuration
    pub fn default_config() -> Self {
        Self {
            interval: JanitorConfig::default().sweep_interval(),
            janitor: CacheJanitor::default_config(),
        }
    }

    /// Run the worker until a shutdown signal (Ctrl+C) is received
    ///
    /// The first sweep runs immediately.
    pub async fn run(&mut self, cache: Arc<ProfileCache>) -> Result<(), JanitorError> {
        let mut ticker = interval(self.interval);

        tracing::info!("Janitor worker started (interval: {:?})", self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    tracing::debug!("Starting sweep cycle");
                    let metrics = self.janitor.sweep(&cache);
                    tracing::debug!(
                        "Sweep completed: {} purged, {} cached",
                        metrics.purged,
                        metrics.last_cache_size
                    );
                }
                signal = tokio::signal::ctrl_c() => {
                    signal.map_err(|e| JanitorError::Worker(e.to_string()))?;
                    tracing::info!("Shutdown signal received, stopping janitor");
                    break;
                }
            }
        }

        tracing::info!("Janitor stopped. Final metrics:\n{}", self.janitor.metrics().summary());
        Ok(())
    }

    /// Run for a specific number of cycles
    pub async fn run_cycles(&mut self, cache: Arc<ProfileCache>, cycles: usize) {
        let mut ticker = interval(self.interval);

        tracing::info!(
            "Janitor worker started for {} cycles (interval: {:?})",
            cycles,
            self.interval
        );

        for cycle in 0..cycles {
            ticker.tick().await;
            let metrics = self.janitor.sweep(&cache);
            tracing::debug!(
                "Sweep {}/{} completed: {} purged",
                cycle + 1,
                cycles,
                metrics.purged
            );
        }

        tracing::info!(
            "Janitor finished {} cycles. Final metrics:\n{}",
            cycles,
            self.janitor.metrics().summary()
        );
    }

    /// Get a reference to the janitor's current metrics
    pub fn metrics(&self) -> &JanitorMetrics {
        self.janitor.metrics()
    }

    /// Reset the janitor's metrics counters
    pub fn reset_metrics(&mut self) {
        self.janitor.reset_metrics();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_worker_creation() {
        let worker = JanitorWorker::default_config();
        assert_eq!(worker.metrics().sweep_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_cycles() {
        let cache = Arc::new(ProfileCache::default_config());
        let config = JanitorConfig {
            sweep_interval_minutes: 1,
            ..Default::default()
        };
        let mut worker = JanitorWorker::new(config).unwrap();

        worker.run_cycles(cache, 3).await;
        assert_eq!(worker.metrics().sweep_count, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_metrics() {
        let cache = Arc::new(ProfileCache::default_config());
        let mut worker = JanitorWorker::default_config();

        worker.run_cycles(cache, 1).await;
        assert_eq!(worker.metrics().sweep_count, 1);

        worker.reset_metrics();
        assert_eq!(worker.metrics().sweep_count, 0);
    }
}
