//! Concurrency tests: shared caches, engines and monitors across threads

#[path = "../common/mod.rs"]
mod common;

use common::*;
use designgraph_extract::features::cache::{
    Cache, CacheFactory, CachingStrategy, EphemeralCache, MemoryStore, TieredCache,
};
use designgraph_extract::features::performance::MetricUnit;
use designgraph_extract::{ExtractionResult, PerformanceMonitor};
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

const THREADS: usize = 16;
const KEYS_PER_THREAD: usize = 50;
const TTL: Duration = Duration::from_secs(3600);

/// Run `work(thread_index)` on `THREADS` threads released together
fn run_together<F>(work: F)
where
    F: Fn(usize) + Send + Sync + 'static,
{
    let work = Arc::new(work);
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let work = Arc::clone(&work);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                work(i);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

fn exercise_disjoint_keys(cache: Arc<dyn Cache<usize>>) {
    let shared = Arc::clone(&cache);
    run_together(move |t| {
        for k in 0..KEYS_PER_THREAD {
            let key = format!("t{t}-k{k}");
            shared.set(&key, t * 1000 + k, TTL);
            assert_eq!(shared.get(&key), Some(t * 1000 + k));
            if k % 2 == 0 {
                assert!(shared.delete(&key));
            }
        }
    });

    // Odd keys survive, even keys are gone, nothing from another thread leaked in
    assert_eq!(cache.size(), THREADS * KEYS_PER_THREAD / 2);
    for t in 0..THREADS {
        for k in 0..KEYS_PER_THREAD {
            let expected = (k % 2 == 1).then_some(t * 1000 + k);
            assert_eq!(cache.get(&format!("t{t}-k{k}")), expected);
        }
    }
}

fn exercise_same_key(cache: Arc<dyn Cache<usize>>) {
    let shared = Arc::clone(&cache);
    run_together(move |t| {
        for _ in 0..KEYS_PER_THREAD {
            shared.set("contended", t, TTL);
            let seen = shared.get("contended");
            assert!(seen.is_some_and(|v| v < THREADS));
        }
    });

    let winner = cache.get("contended").unwrap();
    assert!(winner < THREADS);
    assert_eq!(cache.keys(), vec!["contended".to_string()]);

    // Once writers are done, the last write is what readers see
    cache.set("contended", 999, TTL);
    assert_eq!(cache.get("contended"), Some(999));
}

// ═══════════════════════════════════════════════════════════════════════════
// Caches
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn ephemeral_concurrent_set_get_delete() {
    let cache: Arc<dyn Cache<usize>> = Arc::new(EphemeralCache::<usize>::new(Duration::ZERO));
    exercise_disjoint_keys(cache);
}

#[test]
fn ephemeral_contended_key_keeps_one_writer() {
    let cache: Arc<dyn Cache<usize>> = Arc::new(EphemeralCache::<usize>::new(Duration::ZERO));
    exercise_same_key(cache);
}

#[test]
fn tiered_concurrent_set_get_delete() {
    let store = Arc::new(MemoryStore::new());
    let cache: Arc<dyn Cache<usize>> = Arc::new(TieredCache::<usize>::new(store));
    exercise_disjoint_keys(cache);
}

#[test]
fn tiered_contended_key_keeps_one_writer() {
    let store = Arc::new(MemoryStore::new());
    let cache: Arc<dyn Cache<usize>> = Arc::new(TieredCache::<usize>::new(store));
    exercise_same_key(cache);
}

#[test]
fn tiered_concurrent_promotion_from_secondary() {
    let clock = manual_clock();
    let store = Arc::new(MemoryStore::new());
    let cache = Arc::new(TieredCache::<usize>::with_clock(
        store,
        clock.clone(),
        Duration::ZERO,
        Duration::from_secs(300),
    ));

    for k in 0..KEYS_PER_THREAD {
        cache.set(&format!("k{k}"), k, Duration::from_secs(600));
    }
    // Memory copies expire; every read must come from the secondary tier
    clock.advance(Duration::from_secs(301));

    let shared = Arc::clone(&cache);
    run_together(move |_| {
        for k in 0..KEYS_PER_THREAD {
            assert_eq!(shared.get(&format!("k{k}")), Some(k));
        }
    });

    assert_eq!(cache.memory().size(), KEYS_PER_THREAD);
}

// ═══════════════════════════════════════════════════════════════════════════
// Engine
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn concurrent_extractions_on_one_engine() {
    let engine = Arc::new(engine_with("login", fixture_login_screen()));
    let baseline = engine
        .extract("login", &[], &default_options().with_caching(CachingStrategy::None))
        .unwrap();

    let shared = Arc::clone(&engine);
    let expected = baseline.clone();
    run_together(move |t| {
        let options = match t % 3 {
            0 => default_options(),
            1 => default_options().with_caching(CachingStrategy::Hybrid),
            _ => default_options().with_caching(CachingStrategy::None),
        };
        let result = shared.extract("login", &[], &options).unwrap();

        assert!(result.validation.valid);
        assert_eq!(result.metadata, expected.metadata);
        assert_eq!(result.design_tokens, expected.design_tokens);
        assert_eq!(result.hierarchy.layers(), expected.hierarchy.layers());
    });

    // Every call was recorded on the shared monitor
    let nodes_recorded = engine
        .monitor()
        .records()
        .iter()
        .filter(|record| record.name == "nodes_extracted")
        .count();
    assert_eq!(nodes_recorded, THREADS + 1);

    let cached = engine.extract("login", &[], &default_options()).unwrap();
    assert!(cached.performance.cache_hit);
    assert_eq!(cached.metadata, baseline.metadata);
}

#[test]
fn concurrent_selector_extractions_share_cache_entries() {
    let cache: Arc<dyn Cache<ExtractionResult>> =
        CacheFactory::default().create(CachingStrategy::Memory);
    let engine = Arc::new(engine_with("login", fixture_login_screen()).with_cache(cache.clone()));

    let shared = Arc::clone(&engine);
    run_together(move |t| {
        let ids: &[&str] = match t % 2 {
            0 => &["1:2", "1:3"],
            _ => &["1:3", "1:2"],
        };
        let result = shared
            .extract("login", &selectors(ids), &default_options())
            .unwrap();
        assert_eq!(result.metadata.len(), 2);
        assert_eq!(result.metadata[0].id, "1:2");
    });

    // Both orders resolve to the same two per-root keys
    assert_eq!(cache.size(), 2);
}

// ═══════════════════════════════════════════════════════════════════════════
// Performance monitor
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn same_name_timers_are_independent() {
    let monitor = Arc::new(PerformanceMonitor::new());

    let shared = Arc::clone(&monitor);
    run_together(move |_| {
        let outer = shared.start_timer("tree_process");
        let inner = shared.start_timer("tree_process");
        assert_ne!(outer, inner);

        assert!(shared.end_timer(inner).is_some());
        assert!(shared.end_timer(outer).is_some());
        assert!(shared.end_timer(outer).is_none(), "already stopped");
    });

    assert_eq!(monitor.running_timers(), 0);
    let durations: Vec<_> = monitor
        .records()
        .into_iter()
        .filter(|record| record.name == "tree_process_duration")
        .collect();
    assert_eq!(durations.len(), THREADS * 2);
    assert!(durations.iter().all(|record| record.value >= 0.0));
}

#[test]
fn concurrent_metric_records_are_not_lost() {
    let monitor = Arc::new(PerformanceMonitor::new());

    let shared = Arc::clone(&monitor);
    run_together(move |t| {
        for k in 0..KEYS_PER_THREAD {
            shared.record_metric(
                format!("sample_{t}"),
                k as f64,
                MetricUnit::Count,
            );
        }
    });

    let records = monitor.records();
    assert_eq!(records.len(), THREADS * KEYS_PER_THREAD);
    let names: HashSet<_> = records.iter().map(|record| record.name.as_str()).collect();
    assert_eq!(names.len(), THREADS);
}
