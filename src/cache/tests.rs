use super::*;
use std::thread::sleep;
use std::time::Duration;

const LONG_TTL: Duration = Duration::from_secs(3600);

#[test]
fn test_get_returns_inserted_value() {
    let cache = QueryCache::new(10, LONG_TTL);

    cache.insert("How do I find a co-founder?", vec![1.0_f32, 2.0, 3.0]);

    assert_eq!(
        cache.get("How do I find a co-founder?"),
        Some(vec![1.0, 2.0, 3.0])
    );
    assert_eq!(cache.get("How do I raise a seed round?"), None::<Vec<f32>>);
}

#[test]
fn test_insert_replaces_existing_entry() {
    let cache = QueryCache::new(10, LONG_TTL);

    cache.insert("q", 1_u32);
    cache.insert("q", 2_u32);

    assert_eq!(cache.get("q"), Some(2));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_ttl_expiry_treats_entry_as_absent_and_evicts() {
    let cache = QueryCache::new(10, Duration::from_millis(50));

    cache.insert("q", 1_u32);
    assert_eq!(cache.stats().size, 1);

    sleep(Duration::from_millis(80));

    assert_eq!(cache.get("q"), None);
    // Lazy expiry removed the entry as a side effect of the lookup.
    assert_eq!(cache.stats().size, 0);
}

#[test]
fn test_contains_evicts_expired_entry() {
    let cache = QueryCache::new(10, Duration::from_millis(50));

    cache.insert("q", 1_u32);
    assert!(cache.contains("q"));

    sleep(Duration::from_millis(80));

    assert!(!cache.contains("q"));
    assert_eq!(cache.len(), 0);
}

#[test]
fn test_reinsert_resets_timestamp() {
    let cache = QueryCache::new(10, Duration::from_millis(200));

    cache.insert("q", 1_u32);
    sleep(Duration::from_millis(120));

    // Replacement carries a fresh timestamp, so the entry outlives the
    // original insertion's deadline.
    cache.insert("q", 2_u32);
    sleep(Duration::from_millis(120));

    assert_eq!(cache.get("q"), Some(2));
}

#[test]
fn test_lru_eviction_on_capacity() {
    let cache = QueryCache::new(3, LONG_TTL);

    cache.insert("a", 1_u32);
    cache.insert("b", 2_u32);
    cache.insert("c", 3_u32);
    cache.insert("d", 4_u32);

    assert_eq!(cache.len(), 3);
    assert_eq!(cache.get("a"), None);
    assert_eq!(cache.get("d"), Some(4));
}

#[test]
fn test_lru_recency_updated_on_get() {
    let cache = QueryCache::new(3, LONG_TTL);

    cache.insert("a", 1_u32);
    cache.insert("b", 2_u32);
    cache.insert("c", 3_u32);

    // "a" is now the most recently used, so "b" becomes the LRU victim.
    assert_eq!(cache.get("a"), Some(1));
    cache.insert("d", 4_u32);

    assert_eq!(cache.get("b"), None);
    assert_eq!(cache.get("a"), Some(1));
    assert_eq!(cache.get("c"), Some(3));
    assert_eq!(cache.get("d"), Some(4));
}

#[test]
fn test_remove_and_clear() {
    let cache = QueryCache::new(10, LONG_TTL);

    cache.insert("a", 1_u32);
    cache.insert("b", 2_u32);

    assert_eq!(cache.remove("a"), Some(1));
    assert_eq!(cache.remove("a"), None);
    assert_eq!(cache.len(), 1);

    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn test_independent_instances_are_independent_namespaces() {
    let embeddings: QueryCache<Vec<f32>> = QueryCache::new(10, LONG_TTL);
    let results: QueryCache<Vec<String>> = QueryCache::new(10, LONG_TTL);

    let question = "How do I find a co-founder?";
    embeddings.insert(question, vec![0.1, 0.2]);
    results.insert(question, vec!["chapter".to_string()]);

    embeddings.clear();

    assert!(embeddings.is_empty());
    assert!(results.contains(question));
}

#[test]
fn test_stats_reports_capacity() {
    let cache: QueryCache<u32> = QueryCache::new(5, LONG_TTL);

    assert_eq!(
        cache.stats(),
        CacheStats {
            size: 0,
            max_size: 5
        }
    );

    cache.insert("a", 1);
    assert_eq!(cache.stats().size, 1);
}

#[test]
#[should_panic(expected = "max_size must be non-zero")]
fn test_zero_capacity_panics() {
    let _ = QueryCache::<u32>::new(0, LONG_TTL);
}
