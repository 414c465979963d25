//! Store-level behavior: accounting, degradation, namespace invalidation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use querygate_cache::{
    namespaced_key, CacheBackend, CacheError, CacheStatus, ResponseCache,
};

/// Backend that fails every operation, standing in for a lost connection.
struct BrokenBackend;

#[async_trait]
impl CacheBackend for BrokenBackend {
    async fn get(&self, _key: &str) -> Result<Option<Value>, CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn set(&self, _key: &str, _payload: Value, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn delete(&self, _key: &str) -> Result<bool, CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn delete_by_prefix(&self, _prefix: &str) -> Result<u64, CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn entry_count(&self) -> Result<u64, CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn close(&self) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }
}

#[tokio::test]
async fn test_hit_miss_accounting() {
    let cache = ResponseCache::in_memory(16, Duration::from_secs(60));
    let key = namespaced_key("answer", &json!({"question": "monthly revenue"}));

    assert!(cache.get(&key).await.is_none());
    cache.put(&key, json!({"sql": "SELECT 1"})).await;
    assert_eq!(cache.get(&key).await, Some(json!({"sql": "SELECT 1"})));

    let stats = cache.stats().await;
    assert_eq!(stats.status, CacheStatus::Connected);
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.errors, 0);
    assert_eq!(stats.entries, 1);
}

#[tokio::test]
async fn test_per_entry_ttl_expiry() {
    let cache = ResponseCache::in_memory(16, Duration::from_secs(60));
    cache
        .put_with_ttl("answer:short", json!(1), Duration::from_millis(50))
        .await;
    cache
        .put_with_ttl("answer:long", json!(2), Duration::from_secs(60))
        .await;

    tokio::time::sleep(Duration::from_millis(80)).await;
    assert!(cache.get("answer:short").await.is_none());
    assert_eq!(cache.get("answer:long").await, Some(json!(2)));
}

#[tokio::test]
async fn test_broken_backend_degrades_to_miss() {
    let cache = ResponseCache::new(Arc::new(BrokenBackend), Duration::from_secs(60));

    // Reads miss, writes drop; nothing errors out to the caller.
    cache.put("answer:k", json!(1)).await;
    assert!(cache.get("answer:k").await.is_none());
    assert!(!cache.invalidate("answer:k").await);
    assert_eq!(cache.invalidate_namespace("answer").await, 0);

    let stats = cache.stats().await;
    assert_eq!(stats.status, CacheStatus::Degraded);
    assert_eq!(stats.hits, 0);
    assert!(stats.errors >= 4);
}

#[tokio::test]
async fn test_close_drops_entries_and_is_quiet_on_failure() {
    let cache = ResponseCache::in_memory(16, Duration::from_secs(60));
    cache.put("answer:a", json!(1)).await;
    cache.close().await;
    assert_eq!(cache.stats().await.entries, 0);

    // A broken backend's close failure is logged, not propagated.
    let broken = ResponseCache::new(Arc::new(BrokenBackend), Duration::from_secs(60));
    broken.close().await;
}

#[tokio::test]
async fn test_namespace_invalidation() {
    let cache = ResponseCache::in_memory(16, Duration::from_secs(60));
    cache.put("answer:a", json!(1)).await;
    cache.put("answer:b", json!(2)).await;
    cache.put("schema:a", json!(3)).await;

    assert_eq!(cache.invalidate_namespace("answer").await, 2);
    assert!(cache.get("answer:a").await.is_none());
    assert_eq!(cache.get("schema:a").await, Some(json!(3)));
}
