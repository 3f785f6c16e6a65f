//! Cache tier tests: TTL expiry, promotion, disk persistence, factory wiring

#[path = "../common/mod.rs"]
mod common;

use common::manual_clock;
use designgraph_extract::features::cache::{
    Cache, CacheConfig, CacheFactory, CachingStrategy, DiskStore, EphemeralCache, ManualClock,
    MemoryStore, NoOpCache, SecondaryStore, TieredCache,
};
use pretty_assertions::assert_eq;
use prometheus::Registry;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

const NO_SWEEP: Duration = Duration::ZERO;

// ═══════════════════════════════════════════════════════════════════════════
// Ephemeral
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn ephemeral_entry_expires_after_ttl() {
    let clock = manual_clock();
    let cache: EphemeralCache<String> = EphemeralCache::with_clock(NO_SWEEP, clock.clone());

    cache.set("k", "v".to_string(), Duration::from_secs(1));
    assert_eq!(cache.get("k"), Some("v".to_string()));

    clock.advance(Duration::from_millis(1001));
    assert_eq!(cache.size(), 0);
    assert!(cache.keys().is_empty());
    assert_eq!(cache.entry_count(), 1, "not swept yet");

    assert!(!cache.has("k"));
    assert_eq!(cache.get("k"), None);
    assert_eq!(cache.entry_count(), 0, "lazily evicted on lookup");
}

#[test]
fn ephemeral_sweep_removes_only_expired() {
    let clock = manual_clock();
    let cache: EphemeralCache<u32> = EphemeralCache::with_clock(NO_SWEEP, clock.clone());

    cache.set("short", 1, Duration::from_secs(1));
    cache.set("long", 2, Duration::from_secs(60));
    clock.advance(Duration::from_secs(2));

    assert_eq!(cache.sweep_expired(), 1);
    assert_eq!(cache.keys(), vec!["long".to_string()]);
}

#[test]
fn ephemeral_zero_ttl_deletes() {
    let cache: EphemeralCache<u32> = EphemeralCache::new(NO_SWEEP);
    cache.set("k", 1, Duration::from_secs(60));
    cache.set("k", 2, Duration::ZERO);
    assert!(!cache.has("k"));
}

#[test]
fn ephemeral_background_sweeper_runs() {
    let clock = manual_clock();
    let cache: EphemeralCache<u32> =
        EphemeralCache::with_clock(Duration::from_millis(10), clock.clone());
    assert!(cache.is_sweeping());

    cache.set("k", 1, Duration::from_secs(1));
    clock.advance(Duration::from_secs(5));

    let mut swept = false;
    for _ in 0..200 {
        if cache.entry_count() == 0 {
            swept = true;
            break;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    assert!(swept, "sweeper never removed the expired entry");

    cache.destroy();
    assert!(!cache.is_sweeping());
}

// ═══════════════════════════════════════════════════════════════════════════
// Tiered
// ═══════════════════════════════════════════════════════════════════════════

fn tiered(clock: Arc<ManualClock>) -> (TieredCache<String>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let cache = TieredCache::with_clock(
        store.clone(),
        clock,
        NO_SWEEP,
        Duration::from_secs(300),
    );
    (cache, store)
}

#[test]
fn tiered_secondary_hit_is_promoted() {
    let clock = manual_clock();
    let (cache, _store) = tiered(clock.clone());

    cache.set("k", "v".to_string(), Duration::from_secs(600));
    clock.advance(Duration::from_secs(301));

    assert!(!cache.memory().has("k"), "memory copy capped at 300s");
    assert_eq!(cache.get("k"), Some("v".to_string()));
    assert!(cache.memory().has("k"), "promoted back into memory");
}

#[test]
fn tiered_promotion_never_outlives_entry() {
    let clock = manual_clock();
    let (cache, _store) = tiered(clock.clone());

    cache.set("k", "v".to_string(), Duration::from_secs(400));
    clock.advance(Duration::from_secs(301));
    assert_eq!(cache.get("k"), Some("v".to_string()));

    clock.advance(Duration::from_secs(100));
    assert_eq!(cache.get("k"), None);
    assert!(!cache.has("k"));
}

#[test]
fn tiered_corrupt_secondary_entry_is_a_miss() {
    let clock = manual_clock();
    let (cache, store) = tiered(clock.clone());

    cache.set("k", "v".to_string(), Duration::from_secs(600));
    store.write("k", b"{ definitely not an envelope").unwrap();
    clock.advance(Duration::from_secs(301));

    assert_eq!(cache.get("k"), None);
    assert!(store.read("k").unwrap().is_none(), "corrupt entry removed");
}

#[test]
fn tiered_keys_union_and_delete() {
    let clock = manual_clock();
    let (cache, _store) = tiered(clock.clone());

    cache.set("a", "1".to_string(), Duration::from_secs(60));
    cache.set("b", "2".to_string(), Duration::from_secs(3600));
    clock.advance(Duration::from_secs(301));

    assert_eq!(cache.keys(), vec!["b".to_string()]);
    assert!(cache.delete("b"));
    assert_eq!(cache.size(), 0);
}

// ═══════════════════════════════════════════════════════════════════════════
// Disk persistence
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn disk_tier_survives_a_new_cache() {
    let dir = TempDir::new().unwrap();

    {
        let store = Arc::new(DiskStore::new(dir.path()).unwrap());
        let cache: TieredCache<Vec<f64>> = TieredCache::new(store);
        cache.set("floats", vec![0.1, 1.0 / 3.0], Duration::from_secs(3600));
    }

    let store = Arc::new(DiskStore::new(dir.path()).unwrap());
    let cache: TieredCache<Vec<f64>> = TieredCache::new(store);
    assert_eq!(cache.get("floats"), Some(vec![0.1, 1.0 / 3.0]));
    assert_eq!(cache.keys(), vec!["floats".to_string()]);
}

#[test]
fn disk_store_keys_skip_unreadable_files() {
    let dir = TempDir::new().unwrap();
    let store = DiskStore::new(dir.path()).unwrap();
    store.write("k", b"{}").unwrap();
    std::fs::write(dir.path().join("junk.json"), b"not json").unwrap();

    assert_eq!(store.keys().unwrap(), Vec::<String>::new());
}

#[test]
fn disk_cache_clear_spares_documents_in_shared_dir() {
    let dir = TempDir::new().unwrap();
    let document = dir.path().join("login.json");
    std::fs::write(&document, common::fixture_login_screen_json()).unwrap();

    let factory = CacheFactory::new(
        CacheConfig::default()
            .with_sweep_interval(NO_SWEEP)
            .with_disk_dir(dir.path()),
    );
    let cache = factory.create::<String>(CachingStrategy::Disk);
    cache.set("a", "1".to_string(), Duration::from_secs(60));
    cache.set("b", "2".to_string(), Duration::from_secs(60));
    assert_eq!(cache.keys(), vec!["a".to_string(), "b".to_string()]);

    cache.clear();

    assert!(cache.keys().is_empty());
    assert!(document.exists(), "design document left in place");
    let remaining = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(remaining, 1);
}

// ═══════════════════════════════════════════════════════════════════════════
// NoOp + factory
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn noop_cache_stores_nothing() {
    let cache: NoOpCache<u32> = NoOpCache::new();
    cache.set("k", 1, Duration::from_secs(60));
    assert_eq!(cache.get("k"), None);
    assert_eq!(cache.size(), 0);
    assert!(!cache.delete("k"));
}

#[test]
fn factory_maps_every_strategy() {
    let dir = TempDir::new().unwrap();
    let factory = CacheFactory::new(
        CacheConfig::default()
            .with_sweep_interval(NO_SWEEP)
            .with_disk_dir(dir.path()),
    );

    for strategy in CachingStrategy::ALL {
        let cache = factory.create::<String>(strategy);
        cache.set("k", "v".to_string(), Duration::from_secs(60));
        let stored = cache.get("k").is_some();
        assert_eq!(stored, strategy != CachingStrategy::None, "{strategy}");
    }

    let files = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(files, 1, "only the disk strategy writes to the directory");
}

#[test]
fn factory_unusable_disk_dir_falls_back_to_memory() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let factory = CacheFactory::new(CacheConfig::default().with_disk_dir(file.path()));

    let cache = factory.create::<u32>(CachingStrategy::Disk);
    cache.set("k", 7, Duration::from_secs(60));
    assert_eq!(cache.get("k"), Some(7));
}

#[test]
fn factory_metrics_count_hits_and_misses() {
    let registry = Registry::new();
    let factory = CacheFactory::default().with_registry(&registry).unwrap();
    let cache = factory.create::<u32>(CachingStrategy::Memory);

    cache.set("k", 1, Duration::from_secs(60));
    cache.get("k");
    cache.get("missing");

    let metrics = factory.metrics().unwrap();
    assert_eq!(metrics.hits.get(), 1);
    assert_eq!(metrics.misses.get(), 1);
    assert_eq!(metrics.entries.get(), 1);
    assert!((metrics.hit_rate() - 0.5).abs() < f64::EPSILON);

    let names: Vec<_> = registry.gather().iter().map(|f| f.get_name().to_string()).collect();
    assert!(names.contains(&"designgraph_cache_hits_total".to_string()));
}
