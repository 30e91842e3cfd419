//! The parsing engine

use crate::config::ParserConfig;
use crate::document::detect_document_type;
use crate::error::ExtractorError;
use crate::fallback::FallbackParser;
use crate::fuzzy::FieldMatcher;
use crate::merge::merge_into;
use crate::preprocess::normalize;
use crate::strategies::{default_strategies, detect_category, ExtractionStrategy};
use crate::structure::StructureAnalyzer;
use crate::types::{DocumentMetadata, ParseMetadata, ParseResult, ParseWarning, WarningLevel};
use dossier_domain::confidence_computation::{compute_confidence, ConfidenceConfig};
use dossier_domain::{
    CachedParse, ClientProfile, Confidence, DocumentType, ParseCache, PatternLearner,
};
use dossier_gatekeeper::Gatekeeper;
use dossier_store::{content_hash, CacheConfig, LearningStore, ProfileCache};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Turns client notes into a [`ParseResult`]
///
/// Cheap to clone: configuration, strategies and the shared stores are held
/// behind `Arc`s, so clones share the cache and learned patterns.
#[derive(Clone)]
pub struct Parser {
    config: Arc<ParserConfig>,
    strategies: Arc<Vec<Box<dyn ExtractionStrategy>>>,
    fallback: Arc<FallbackParser>,
    analyzer: StructureAnalyzer,
    gatekeeper: Arc<Gatekeeper>,
    cache: Arc<dyn ParseCache>,
    confidence: Arc<ConfidenceConfig>,
}

impl Parser {
    /// Create a parser over shared cache and learning stores
    ///
    /// Fails fast on invalid configuration.
    pub fn new(
        config: ParserConfig,
        cache: Arc<dyn ParseCache>,
        learner: Arc<dyn PatternLearner>,
    ) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;

        let matcher = FieldMatcher::new(
            config.custom_synonyms(),
            config.fuzzy_threshold,
            config.enable_fuzzy_matching,
            learner,
        );
        let strategies = default_strategies(&config, &matcher);
        let fallback = FallbackParser::new(&matcher, config.max_value_length);

        Ok(Self {
            analyzer: StructureAnalyzer::new(config.min_fragment_length),
            strategies: Arc::new(strategies),
            fallback: Arc::new(fallback),
            gatekeeper: Arc::new(Gatekeeper::default_config()),
            cache,
            confidence: Arc::new(ConfidenceConfig::default()),
            config: Arc::new(config),
        })
    }

    /// Create a parser with its own fresh in-memory stores
    pub fn in_memory(config: ParserConfig) -> Result<Self, ExtractorError> {
        let cache = ProfileCache::new(CacheConfig::default())?;
        Self::new(config, Arc::new(cache), Arc::new(LearningStore::new()))
    }

    /// Replace the validator
    pub fn with_gatekeeper(mut self, gatekeeper: Gatekeeper) -> Self {
        self.gatekeeper = Arc::new(gatekeeper);
        self
    }

    /// Replace the strategy list; strategies merge in the given order
    pub fn with_strategies(mut self, strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        self.strategies = Arc::new(strategies);
        self
    }

    /// Active configuration
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Names of the strategies, in merge order
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Parse a document
    ///
    /// Never fails: empty or unreadable input yields an empty profile with
    /// zero confidence and an error-level warning.
    pub fn parse(&self, text: &str, metadata: DocumentMetadata) -> ParseResult {
        let start = Instant::now();
        info!(
            "Starting parse of {} ({} bytes)",
            metadata.file_name.as_deref().unwrap_or("<inline>"),
            text.len()
        );

        let normalized = normalize(text);
        let mut meta = ParseMetadata::new(metadata, content_hash(&normalized));
        let mut warnings = Vec::new();

        if normalized.is_empty() {
            debug!("Nothing left after normalization");
            let profile = ClientProfile::new();
            let confidence = compute_confidence(&profile, &self.confidence);
            return self.finish(
                &normalized,
                profile,
                confidence,
                DocumentType::Narrative,
                warnings,
                meta,
                start,
            );
        }

        if self.config.enable_caching {
            if let Some(cached) = self.cache.lookup(&normalized) {
                info!("Cache hit for {}", meta.content_hash);
                meta.from_cache = true;
                return self.finish(
                    &normalized,
                    cached.profile,
                    cached.confidence,
                    cached.document_type,
                    warnings,
                    meta,
                    start,
                );
            }
        }

        let structure = self.analyzer.analyze(&normalized);
        meta.section_count = structure.sections.len();

        let mut profile = ClientProfile::new();
        for strategy in self.strategies.iter() {
            let name = strategy.name();
            meta.strategies_run.push(name.to_string());
            match strategy.run(&normalized, &structure) {
                Ok(partial) => {
                    let changed = merge_into(&mut profile, partial, self.config.max_value_length);
                    debug!("Strategy {} merged (changed: {})", name, changed);
                }
                Err(e) => {
                    warn!("Strategy {} failed: {}", name, e);
                    meta.strategies_failed.push(name.to_string());
                    warnings.push(ParseWarning::new(
                        WarningLevel::Warning,
                        format!("Strategy '{}' failed and was skipped: {}", name, e),
                    ));
                }
            }
        }

        let mut confidence = compute_confidence(&profile, &self.confidence);
        debug!("Confidence after strategies: {:.3}", confidence.overall);

        if self.config.enable_fallback && !confidence.meets(self.config.confidence_threshold) {
            let outcome = self.fallback.run(&profile, &normalized, &structure);
            for (name, message) in outcome.failures {
                meta.strategies_failed.push(name.to_string());
                warnings.push(ParseWarning::new(
                    WarningLevel::Warning,
                    format!("Fallback heuristic '{}' failed and was skipped: {}", name, message),
                ));
            }
            if let Some(heuristic) = outcome.heuristic {
                info!(
                    "Fallback heuristic {} adopted (improvement {:.3})",
                    heuristic, outcome.improvement
                );
                profile = outcome.profile;
                confidence = compute_confidence(&profile, &self.confidence);
                meta.fallback_applied = true;
                meta.fallback_heuristic = Some(heuristic.to_string());
                warnings.push(
                    ParseWarning::new(
                        WarningLevel::Warning,
                        format!("Low confidence; fallback applied ({})", heuristic),
                    )
                    .with_suggestion("Label key lines, e.g. \"Client: Acme Corp\""),
                );
            } else {
                debug!("No fallback heuristic improved coverage");
            }
        }

        let document_type = detect_document_type(&normalized, &structure);

        if self.config.enable_caching {
            self.cache.store(
                &normalized,
                CachedParse {
                    profile: profile.clone(),
                    confidence: confidence.clone(),
                    document_type,
                },
            );
        }

        self.finish(&normalized, profile, confidence, document_type, warnings, meta, start)
    }

    /// Parse raw bytes, replacing malformed UTF-8
    pub fn parse_bytes(&self, bytes: &[u8], metadata: DocumentMetadata) -> ParseResult {
        self.parse(&String::from_utf8_lossy(bytes), metadata)
    }

    /// Parse on a blocking worker under a time limit
    ///
    /// A parse that does not finish in time yields an empty profile with
    /// zero confidence and an error-level warning. The worker itself is not
    /// interrupted; its result is discarded.
    pub async fn parse_with_timeout(
        &self,
        text: String,
        metadata: DocumentMetadata,
        limit: Duration,
    ) -> ParseResult {
        let start = Instant::now();
        let parser = self.clone();
        let task_metadata = metadata.clone();
        let task = tokio::task::spawn_blocking(move || parser.parse(&text, task_metadata));

        let error = match timeout(limit, task).await {
            Ok(Ok(result)) => return result,
            Ok(Err(e)) => ExtractorError::Task(e.to_string()),
            Err(_) => ExtractorError::Timeout,
        };
        warn!("Parse abandoned: {}", error);

        let message = match error {
            ExtractorError::Timeout => format!("Parse timed out after {} ms", limit.as_millis()),
            other => other.to_string(),
        };
        let warnings = vec![ParseWarning::new(WarningLevel::Error, message)
            .with_suggestion("Split the document or raise parse_timeout_secs")];
        let meta = ParseMetadata::new(metadata, String::new());
        let profile = ClientProfile::new();
        let confidence = compute_confidence(&profile, &self.confidence);
        self.finish(
            "",
            profile,
            confidence,
            DocumentType::Narrative,
            warnings,
            meta,
            start,
        )
    }

    /// Parse under the configured time limit
    pub async fn parse_bounded(&self, text: String, metadata: DocumentMetadata) -> ParseResult {
        self.parse_with_timeout(text, metadata, self.config.parse_timeout())
            .await
    }

    /// Validate, add the missing-name warning and fill in timing
    #[allow(clippy::too_many_arguments)]
    fn finish(
        &self,
        normalized: &str,
        profile: ClientProfile,
        confidence: Confidence,
        document_type: DocumentType,
        mut warnings: Vec<ParseWarning>,
        mut meta: ParseMetadata,
        start: Instant,
    ) -> ParseResult {
        let client_type = self
            .config
            .client_type
            .clone()
            .or_else(|| detect_category(normalized).map(|c| c.as_str().to_string()));
        let validation = self
            .gatekeeper
            .validate(&profile, document_type, client_type.as_deref());

        let aborted = warnings.iter().any(|w| w.level == WarningLevel::Error);
        if profile.client_name.trim().is_empty() && !aborted {
            warnings.push(
                ParseWarning::new(WarningLevel::Error, "Client name could not be extracted")
                    .with_suggestion("Add a line such as \"Client: Acme Corp\""),
            );
        }

        meta.client_type = client_type;
        meta.processing_time_ms = start.elapsed().as_millis() as u64;

        info!(
            "Parse complete: {} fields, confidence {:.2}, {} ({} ms)",
            profile.populated_fields(),
            confidence.overall,
            document_type,
            meta.processing_time_ms
        );

        ParseResult {
            data: profile,
            confidence,
            document_type,
            validation,
            warnings,
            metadata: meta,
        }
    }
}

impl std::fmt::Debug for Parser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser")
            .field("config", &self.config)
            .field("strategies", &self.strategy_names())
            .field("fallback", &self.fallback)
            .finish()
    }
}
