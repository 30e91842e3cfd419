//! Parse cache keyed by normalized-content hash

use crate::{current_timestamp, StoreError};
use dossier_domain::{CachedParse, ClientProfile, Confidence, DocumentType, ParseCache};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Hex SHA-256 of the normalized document text
pub fn content_hash(normalized_text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalized_text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Configuration for the parse cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of entries kept
    pub max_entries: usize,

    /// Validity window in seconds
    pub ttl_secs: u64,

    /// Results must exceed this overall confidence to be cached or served
    pub min_confidence: f64,

    /// Fraction of entries evicted when the bound is exceeded
    pub eviction_fraction: f64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 100,
            ttl_secs: 24 * 60 * 60,
            min_confidence: 0.9,
            eviction_fraction: 0.1,
        }
    }
}

impl CacheConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_entries == 0 {
            return Err("max_entries must be greater than 0".to_string());
        }
        if self.ttl_secs == 0 {
            return Err("ttl_secs must be greater than 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(format!(
                "min_confidence {} out of range [0.0, 1.0]",
                self.min_confidence
            ));
        }
        if !(self.eviction_fraction > 0.0 && self.eviction_fraction <= 1.0) {
            return Err(format!(
                "eviction_fraction {} out of range (0.0, 1.0]",
                self.eviction_fraction
            ));
        }
        Ok(())
    }
}

/// One cached parse
#[derive(Debug)]
pub struct CacheEntry {
    /// Hash of the normalized content
    pub content_hash: String,
    /// Cached profile
    pub profile: ClientProfile,
    /// Confidence at storage time
    pub confidence: Confidence,
    /// Detected layout
    pub document_type: DocumentType,
    /// Storage time (seconds since Unix epoch)
    pub stored_at: u64,
    /// Monotonic storage order, used for eviction
    sequence: u64,
    /// Times served from the cache
    access_count: AtomicU64,
}

impl CacheEntry {
    /// Times this entry has been served
    pub fn access_count(&self) -> u64 {
        self.access_count.load(Ordering::Relaxed)
    }

    fn is_fresh(&self, now: u64, ttl_secs: u64) -> bool {
        now.saturating_sub(self.stored_at) < ttl_secs
    }

    fn to_cached_parse(&self) -> CachedParse {
        CachedParse {
            profile: self.profile.clone(),
            confidence: self.confidence.clone(),
            document_type: self.document_type,
        }
    }
}

/// In-memory parse cache with a validity window and bounded size
///
/// Reads take a shared lock and bump an atomic access counter; stores and
/// evictions take the exclusive lock, so concurrent evictions cannot lose
/// updates.
pub struct ProfileCache {
    config: CacheConfig,
    entries: RwLock<HashMap<String, CacheEntry>>,
    sequence: AtomicU64,
}

impl ProfileCache {
    /// Create a cache with the given configuration
    pub fn new(config: CacheConfig) -> Result<Self, StoreError> {
        config.validate().map_err(StoreError::Config)?;
        Ok(Self {
            config,
            entries: RwLock::new(HashMap::new()),
            sequence: AtomicU64::new(0),
        })
    }

    /// Create a cache with default configuration
    pub fn default_config() -> Self {
        Self {
            config: CacheConfig::default(),
            entries: RwLock::new(HashMap::new()),
            sequence: AtomicU64::new(0),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Look up a parse as of `now` (seconds since Unix epoch)
    pub fn lookup_at(&self, normalized_text: &str, now: u64) -> Option<CachedParse> {
        let key = content_hash(normalized_text);
        let entries = self.entries.read();
        let entry = entries.get(&key)?;

        if entry.confidence.overall <= self.config.min_confidence {
            return None;
        }
        if !entry.is_fresh(now, self.config.ttl_secs) {
            debug!("Cache entry {} expired", &key[..12]);
            return None;
        }

        entry.access_count.fetch_add(1, Ordering::Relaxed);
        debug!("Cache hit for {}", &key[..12]);
        Some(entry.to_cached_parse())
    }

    /// Store a parse as of `now`; returns false when the result was declined
    pub fn store_at(&self, normalized_text: &str, parse: CachedParse, now: u64) -> bool {
        if parse.confidence.overall <= self.config.min_confidence {
            debug!(
                "Not caching parse with confidence {:.2} (floor {:.2})",
                parse.confidence.overall, self.config.min_confidence
            );
            return false;
        }

        let key = content_hash(normalized_text);
        let entry = CacheEntry {
            content_hash: key.clone(),
            profile: parse.profile,
            confidence: parse.confidence,
            document_type: parse.document_type,
            stored_at: now,
            sequence: self.sequence.fetch_add(1, Ordering::Relaxed),
            access_count: AtomicU64::new(0),
        };

        let mut entries = self.entries.write();
        entries.insert(key, entry);
        if entries.len() > self.config.max_entries {
            let evicted = self.evict_oldest(&mut entries);
            debug!("Cache bound exceeded, evicted {} entries", evicted);
        }
        true
    }

    /// Remove the oldest-stored batch of entries; returns how many were removed
    fn evict_oldest(&self, entries: &mut HashMap<String, CacheEntry>) -> usize {
        let batch = ((entries.len() as f64) * self.config.eviction_fraction).ceil() as usize;
        let overflow = entries.len().saturating_sub(self.config.max_entries);
        let count = batch.max(overflow).max(1);

        let mut by_age: Vec<(u64, String)> = entries
            .iter()
            .map(|(k, e)| (e.sequence, k.clone()))
            .collect();
        by_age.sort_unstable();

        for (_, key) in by_age.into_iter().take(count) {
            entries.remove(&key);
        }
        count
    }

    /// Drop every entry past the validity window as of `now`
    pub fn purge_expired(&self, now: u64) -> usize {
        let ttl = self.config.ttl_secs;
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, e| e.is_fresh(now, ttl));
        before - entries.len()
    }

    /// Number of entries past the validity window as of `now`
    pub fn count_expired(&self, now: u64) -> usize {
        let ttl = self.config.ttl_secs;
        self.entries
            .read()
            .values()
            .filter(|e| !e.is_fresh(now, ttl))
            .count()
    }

    /// Whether an entry exists for this text, fresh or not
    pub fn contains(&self, normalized_text: &str) -> bool {
        self.entries.read().contains_key(&content_hash(normalized_text))
    }

    /// Times the entry for this text has been served
    pub fn access_count(&self, normalized_text: &str) -> Option<u64> {
        self.entries
            .read()
            .get(&content_hash(normalized_text))
            .map(CacheEntry::access_count)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// True when the cache holds nothing
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl ParseCache for ProfileCache {
    fn lookup(&self, normalized_text: &str) -> Option<CachedParse> {
        self.lookup_at(normalized_text, current_timestamp())
    }

    fn store(&self, normalized_text: &str, parse: CachedParse) {
        self.store_at(normalized_text, parse, current_timestamp());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_with_confidence(overall: f64) -> CachedParse {
        let mut profile = ClientProfile::new();
        profile.client_name = "Acme Corp".to_string();
        CachedParse {
            profile,
            confidence: Confidence {
                overall,
                ..Confidence::default()
            },
            document_type: DocumentType::Brief,
        }
    }

    #[test]
    fn test_content_hash_is_stable_hex() {
        let a = content_hash("Client: Acme");
        assert_eq!(a, content_hash("Client: Acme"));
        assert_ne!(a, content_hash("Client: Acme "));
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_store_and_lookup() {
        let cache = ProfileCache::default_config();
        assert!(cache.store_at("doc", parse_with_confidence(0.95), 1_000));

        let hit = cache.lookup_at("doc", 1_100).unwrap();
        assert_eq!(hit.profile.client_name, "Acme Corp");
        assert_eq!(cache.access_count("doc"), Some(1));
    }

    #[test]
    fn test_low_confidence_is_declined() {
        let cache = ProfileCache::default_config();
        assert!(!cache.store_at("doc", parse_with_confidence(0.9), 1_000));
        assert!(!cache.contains("doc"));
    }

    #[test]
    fn test_expired_entry_is_not_served() {
        let cache = ProfileCache::default_config();
        cache.store_at("doc", parse_with_confidence(0.95), 1_000);

        let day = 24 * 60 * 60;
        assert!(cache.lookup_at("doc", 1_000 + day - 1).is_some());
        assert!(cache.lookup_at("doc", 1_000 + day).is_none());
        assert!(cache.lookup_at("doc", 1_000 + day * 2).is_none());
    }

    #[test]
    fn test_batch_eviction() {
        let cache = ProfileCache::default_config();
        for i in 0..101 {
            cache.store_at(&format!("doc {}", i), parse_with_confidence(0.95), 1_000 + i);
        }
        // 101 entries exceed the bound; the oldest ceil(10.1) = 11 go
        assert_eq!(cache.len(), 90);
        assert!(!cache.contains("doc 0"));
        assert!(!cache.contains("doc 10"));
        assert!(cache.contains("doc 11"));
        assert!(cache.contains("doc 100"));
    }

    #[test]
    fn test_purge_expired() {
        let cache = ProfileCache::default_config();
        cache.store_at("old", parse_with_confidence(0.95), 0);
        cache.store_at("new", parse_with_confidence(0.95), 100_000);

        assert_eq!(cache.count_expired(100_001), 1);
        assert_eq!(cache.purge_expired(100_001), 1);
        assert!(cache.contains("new"));
        assert!(!cache.contains("old"));
    }

    #[test]
    fn test_invalid_config() {
        let config = CacheConfig {
            max_entries: 0,
            ..CacheConfig::default()
        };
        assert!(ProfileCache::new(config).is_err());

        let config = CacheConfig {
            min_confidence: 1.5,
            ..CacheConfig::default()
        };
        assert!(ProfileCache::new(config).is_err());
    }
}
