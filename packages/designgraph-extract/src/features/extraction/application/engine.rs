//! Extraction engine
//!
//! Orchestrates one extraction call end to end:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │           ExtractionEngine::extract(ref, selectors)          │
//! ├──────────────────────────────────────────────────────────────┤
//! │  1. Range-check options                                      │
//! │  2. Per traversal root: cache lookup (blake3 key)            │
//! │  3. Any miss → fetch source once                             │
//! │  4. Walk missed roots (rayon, one walker per root)           │
//! │  5. Merge parts in sorted selector order                     │
//! │  6. Validate; strict + invalid → ValidationFailed            │
//! │  7. Store fresh parts with the strategy TTL                  │
//! │  8. Attach performance metrics                               │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cached values are per-root parts without validation or performance data;
//! validation reruns on every call, hit or miss. Every option (validation
//! level included) is part of the key, so changing any of them is a miss.

use crate::config::Validatable;
use crate::errors::{EngineResult, ExtractionError};
use crate::features::cache::{Cache, CacheFactory, CachingStrategy};
use crate::features::extraction::domain::{
    CancellationToken, Diagnostic, ExtractionOptions, ExtractionResult, RESULT_VERSION,
};
use crate::features::extraction::infrastructure::{
    traversal_cache_key, TraversalOutput, TreeWalker, WalkLimits,
};
use crate::features::extraction::ports::{SourceDocument, SourceProvider};
use crate::features::performance::{MetricUnit, PerformanceMonitor};
use crate::features::validation::{ValidationLevel, Validator};
use crate::shared::models::DesignNode;
use chrono::Utc;
use dashmap::DashMap;
use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

type ResultCache = Arc<dyn Cache<ExtractionResult>>;

/// How the engine finds the cache for a call
enum CacheBinding {
    /// One injected cache for every strategy except `None`
    Fixed(ResultCache),
    /// Lazily created per strategy through the factory
    PerStrategy {
        factory: CacheFactory,
        caches: DashMap<CachingStrategy, ResultCache>,
    },
}

pub struct ExtractionEngine {
    source: Arc<dyn SourceProvider>,
    cache: CacheBinding,
    validator: Validator,
    monitor: Arc<PerformanceMonitor>,
}

impl ExtractionEngine {
    /// Engine with a default `CacheFactory` (in-process tiers only)
    pub fn new(source: Arc<dyn SourceProvider>) -> Self {
        Self {
            source,
            cache: CacheBinding::PerStrategy {
                factory: CacheFactory::default(),
                caches: DashMap::new(),
            },
            validator: Validator::new(),
            monitor: Arc::new(PerformanceMonitor::new()),
        }
    }

    pub fn with_cache_factory(mut self, factory: CacheFactory) -> Self {
        self.cache = CacheBinding::PerStrategy {
            factory,
            caches: DashMap::new(),
        };
        self
    }

    /// Use `cache` for every call whose strategy is not `None`
    pub fn with_cache(mut self, cache: Arc<dyn Cache<ExtractionResult>>) -> Self {
        self.cache = CacheBinding::Fixed(cache);
        self
    }

    /// Shared monitor that accumulates per-call totals across extractions
    pub fn with_monitor(mut self, monitor: Arc<PerformanceMonitor>) -> Self {
        self.monitor = monitor;
        self
    }

    pub fn monitor(&self) -> &Arc<PerformanceMonitor> {
        &self.monitor
    }

    /// Cache used for `strategy` (`None` for `CachingStrategy::None`)
    pub fn cache_for(&self, strategy: CachingStrategy) -> Option<ResultCache> {
        if strategy == CachingStrategy::None {
            return None;
        }

        match &self.cache {
            CacheBinding::Fixed(cache) => Some(Arc::clone(cache)),
            CacheBinding::PerStrategy { factory, caches } => Some(Arc::clone(
                caches
                    .entry(strategy)
                    .or_insert_with(|| factory.create(strategy))
                    .value(),
            )),
        }
    }

    pub fn extract(
        &self,
        source_ref: &str,
        selectors: &[String],
        options: &ExtractionOptions,
    ) -> EngineResult<ExtractionResult> {
        self.extract_with_cancel(source_ref, selectors, options, &CancellationToken::new())
    }

    pub fn extract_with_cancel(
        &self,
        source_ref: &str,
        selectors: &[String],
        options: &ExtractionOptions,
        cancel: &CancellationToken,
    ) -> EngineResult<ExtractionResult> {
        let started = Instant::now();
        options
            .validate()
            .map_err(|e| ExtractionError::invalid_options(e.to_string()))?;
        if cancel.is_cancelled() {
            return Err(ExtractionError::Cancelled);
        }

        let selectors = sorted_selectors(selectors);
        let roots: Vec<&str> = if selectors.is_empty() {
            vec![""]
        } else {
            selectors.iter().map(String::as_str).collect()
        };

        tracing::info!(
            "Extracting {} ({} root(s), strategy={}, validation={})",
            source_ref,
            roots.len(),
            options.caching_strategy,
            options.validation_level.as_str()
        );

        let monitor = PerformanceMonitor::new();
        let cache = self.cache_for(options.caching_strategy);

        let keys: Vec<String> = roots
            .iter()
            .map(|root| traversal_cache_key(source_ref, &selectors, options, root))
            .collect();

        let mut parts: Vec<Option<ExtractionResult>> = keys
            .iter()
            .map(|key| cache.as_ref().and_then(|cache| cache.get(key)))
            .collect();

        let cache_hits = parts.iter().filter(|part| part.is_some()).count();
        let cache_misses = parts.len() - cache_hits;
        tracing::debug!(
            "Cache lookup for {}: {} hit(s), {} miss(es)",
            source_ref,
            cache_hits,
            cache_misses
        );

        let mut fresh = Vec::new();
        if cache_misses > 0 {
            let timer = monitor.start_timer("source_fetch");
            let document = self.source.fetch(source_ref)?;
            monitor.end_timer(timer);

            let mut pending = Vec::with_capacity(cache_misses);
            for (index, root) in roots.iter().enumerate() {
                if parts[index].is_none() {
                    pending.push((index, resolve_root(&document, root)?));
                }
            }

            let timer = monitor.start_timer("tree_process");
            let limits = WalkLimits::from_options(options);
            let walked: Vec<(usize, EngineResult<TraversalOutput>)> = pending
                .par_iter()
                .map(|(index, node)| {
                    let output = TreeWalker::new(limits).with_cancel(cancel).walk(node);
                    (*index, output)
                })
                .collect();
            monitor.end_timer(timer);

            for ((index, output), (_, node)) in walked.into_iter().zip(&pending) {
                let part = part_from(output?, source_diagnostics_for(&document, node));
                if cache.is_some() {
                    fresh.push((index, part.clone()));
                }
                parts[index] = Some(part);
            }
        }

        let mut result = ExtractionResult::merge(parts.into_iter().flatten());
        result.validation = self
            .validator
            .validate(&result, options.validation_level);

        if options.validation_level == ValidationLevel::Strict && !result.validation.valid {
            tracing::warn!(
                "Strict validation rejected {} with {} error(s)",
                source_ref,
                result.validation.errors.len()
            );
            return Err(ExtractionError::ValidationFailed(Box::new(result.validation)));
        }

        if let Some(cache) = &cache {
            let ttl = options.caching_strategy.default_ttl();
            for (index, part) in fresh {
                cache.set(&keys[index], part, ttl);
            }
        }

        let extraction_ms = started.elapsed().as_secs_f64() * 1000.0;
        let mut performance = monitor.get_metrics();
        performance.extraction_ms = extraction_ms;
        performance.node_count = result.node_count();
        performance.cache_hits = cache_hits;
        performance.cache_misses = cache_misses;
        performance.cache_hit = cache_misses == 0;
        result.performance = performance;

        self.monitor
            .record_metric("extraction_duration", extraction_ms, MetricUnit::Milliseconds);
        self.monitor.record_metric(
            "nodes_extracted",
            result.performance.node_count as f64,
            MetricUnit::Count,
        );

        tracing::info!(
            "Extracted {}: {} node(s), {} layer(s), {} token(s), {:.2}ms{}",
            source_ref,
            result.performance.node_count,
            result.hierarchy.layers().len(),
            result.design_tokens.len(),
            extraction_ms,
            if result.performance.cache_hit {
                " (cached)"
            } else {
                ""
            }
        );

        Ok(result)
    }
}

/// Deduplicated, sorted selectors
fn sorted_selectors(selectors: &[String]) -> Vec<String> {
    let mut sorted = selectors.to_vec();
    sorted.sort();
    sorted.dedup();
    sorted
}

/// Traversal root for a selector (empty selector = document root)
fn resolve_root<'a>(document: &'a SourceDocument, selector: &str) -> EngineResult<&'a DesignNode> {
    if selector.is_empty() {
        return Ok(&document.root);
    }

    document.root.find(selector).ok_or_else(|| {
        ExtractionError::invalid_source(format!("selector '{}' not found in document", selector))
    })
}

/// Normalization diagnostics that belong to the subtree under `root`
///
/// Diagnostics without a node id belong to the document root.
fn source_diagnostics_for(document: &SourceDocument, root: &DesignNode) -> Vec<Diagnostic> {
    if document.diagnostics.is_empty() {
        return Vec::new();
    }

    let is_document_root = std::ptr::eq(root, &document.root);
    let ids: HashSet<&str> = root.iter().map(|(_, node)| node.id.as_str()).collect();

    document
        .diagnostics
        .iter()
        .filter(|diagnostic| match diagnostic.node_id.as_deref() {
            Some(id) => ids.contains(id),
            None => is_document_root,
        })
        .cloned()
        .collect()
}

fn part_from(output: TraversalOutput, mut source_diagnostics: Vec<Diagnostic>) -> ExtractionResult {
    let mut diagnostics = output.diagnostics;
    diagnostics.append(&mut source_diagnostics);

    ExtractionResult {
        metadata: vec![output.tree],
        hierarchy: output.hierarchy,
        design_tokens: output.tokens,
        component_instances: output.instances,
        diagnostics,
        extracted_at: Utc::now(),
        version: RESULT_VERSION.to_string(),
        ..ExtractionResult::empty()
    }
}
