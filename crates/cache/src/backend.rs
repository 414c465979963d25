//! Storage backends.
//!
//! The trait keeps the store generic over where entries live; the bundled
//! backend is in-process. A networked backend (Redis or similar) would slot
//! in behind the same trait.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache;
use serde_json::Value;
use thiserror::Error;

use querygate_error::{ErrorCode, GateError};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache backend unavailable: {0}")]
    Unavailable(String),

    #[error("Cache payload serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<CacheError> for GateError {
    fn from(err: CacheError) -> Self {
        GateError::new(ErrorCode::CacheUnavailable, err.to_string())
    }
}

/// Key-value storage with per-entry TTL.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Fetch a live entry. Expired entries are never returned, even if the
    /// backend has not evicted them yet.
    async fn get(&self, key: &str) -> Result<Option<Value>, CacheError>;

    async fn set(&self, key: &str, payload: Value, ttl: Duration) -> Result<(), CacheError>;

    /// Remove one entry; returns whether it existed.
    async fn delete(&self, key: &str) -> Result<bool, CacheError>;

    /// Remove every entry whose key starts with `prefix`; returns the count.
    async fn delete_by_prefix(&self, prefix: &str) -> Result<u64, CacheError>;

    async fn entry_count(&self) -> Result<u64, CacheError>;

    /// Release the backend's resources. Called once at shutdown; operations
    /// after close may fail.
    async fn close(&self) -> Result<(), CacheError>;
}

#[derive(Clone)]
struct Entry {
    payload: Value,
    created_at: Instant,
    ttl: Duration,
}

/// Eviction follows each entry's own TTL rather than one cache-wide setting.
struct PerEntryTtl;

impl moka::Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// In-process backend on a bounded concurrent cache.
pub struct MemoryBackend {
    cache: Cache<String, Entry>,
}

impl MemoryBackend {
    pub fn new(max_entries: u64) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(max_entries)
                .expire_after(PerEntryTtl)
                .build(),
        }
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Value>, CacheError> {
        match self.cache.get(key).await {
            // Eviction is lazy; re-check the deadline on every read so a
            // not-yet-evicted entry past its TTL still reads as a miss.
            Some(entry) if entry.created_at.elapsed() < entry.ttl => Ok(Some(entry.payload)),
            Some(_) => {
                self.cache.invalidate(key).await;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, payload: Value, ttl: Duration) -> Result<(), CacheError> {
        let entry = Entry {
            payload,
            created_at: Instant::now(),
            ttl,
        };
        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.cache.remove(key).await.is_some())
    }

    async fn delete_by_prefix(&self, prefix: &str) -> Result<u64, CacheError> {
        let keys: Vec<String> = self
            .cache
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.as_ref().clone())
            .collect();
        let removed = keys.len() as u64;
        for key in keys {
            self.cache.invalidate(&key).await;
        }
        Ok(removed)
    }

    async fn entry_count(&self) -> Result<u64, CacheError> {
        self.cache.run_pending_tasks().await;
        Ok(self.cache.entry_count())
    }

    async fn close(&self) -> Result<(), CacheError> {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_get_roundtrip() {
        let backend = MemoryBackend::new(16);
        backend
            .set("answer:k1", json!({"sql": "SELECT 1"}), Duration::from_secs(60))
            .await
            .unwrap();

        let got = backend.get("answer:k1").await.unwrap();
        assert_eq!(got, Some(json!({"sql": "SELECT 1"})));
        assert_eq!(backend.get("answer:other").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_entry_reads_as_miss() {
        let backend = MemoryBackend::new(16);
        backend
            .set("answer:k1", json!(1), Duration::from_millis(50))
            .await
            .unwrap();

        assert!(backend.get("answer:k1").await.unwrap().is_some());
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(backend.get("answer:k1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_reports_presence() {
        let backend = MemoryBackend::new(16);
        backend
            .set("answer:k1", json!(1), Duration::from_secs(60))
            .await
            .unwrap();

        assert!(backend.delete("answer:k1").await.unwrap());
        assert!(!backend.delete("answer:k1").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_by_prefix_scopes_to_namespace() {
        let backend = MemoryBackend::new(16);
        for key in ["answer:a", "answer:b", "schema:a"] {
            backend
                .set(key, json!(1), Duration::from_secs(60))
                .await
                .unwrap();
        }

        assert_eq!(backend.delete_by_prefix("answer:").await.unwrap(), 2);
        assert_eq!(backend.get("answer:a").await.unwrap(), None);
        assert!(backend.get("schema:a").await.unwrap().is_some());
    }
}
