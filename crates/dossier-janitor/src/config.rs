//! Configuration for Janitor operations
//!
//! Defines the sweep interval and operational mode.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the cache janitor
///
/// # Examples
///
/// ```
/// use dossier_janitor::JanitorConfig;
///
/// // Default configuration (hourly sweeps)
/// let config = JanitorConfig::default();
/// assert_eq!(config.sweep_interval_minutes, 60);
///
/// // Frequent sweeps for small cache bounds
/// let config = JanitorConfig::aggressive();
/// assert_eq!(config.sweep_interval_minutes, 15);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JanitorConfig {
    /// How often to run the sweep cycle (in minutes)
    /// Default: every 60 minutes
    pub sweep_interval_minutes: u64,

    /// Dry-run mode: count what would be purged without removing it
    /// Default: false
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            sweep_interval_minutes: 60,
            dry_run: false,
        }
    }
}

impl JanitorConfig {
    /// Frequent sweeps (every 15 minutes)
    pub fn aggressive() -> Self {
        Self {
            sweep_interval_minutes: 15,
            ..Self::default()
        }
    }

    /// Infrequent sweeps (every 4 hours)
    pub fn lenient() -> Self {
        Self {
            sweep_interval_minutes: 240,
            ..Self::default()
        }
    }

    /// Get sweep interval as Duration
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_minutes * 60)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.sweep_interval_minutes == 0 {
            return Err("sweep_interval_minutes must be greater than 0".to_string());
        }
        Ok(())
    }
}
