//! The response cache the pipeline talks to.
//!
//! Cache trouble is never a user-facing failure: a backend error on read
//! degrades to a miss, on write it is dropped, both with a warning and an
//! error counter bump. Correct answers without the cache beat no answers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::backend::{CacheBackend, MemoryBackend};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    Connected,
    Degraded,
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub status: CacheStatus,
    pub hits: u64,
    pub misses: u64,
    pub errors: u64,
    pub entries: u64,
}

pub struct ResponseCache {
    backend: Arc<dyn CacheBackend>,
    default_ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
    errors: AtomicU64,
}

impl ResponseCache {
    pub fn new(backend: Arc<dyn CacheBackend>, default_ttl: Duration) -> Self {
        Self {
            backend,
            default_ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            errors: AtomicU64::new(0),
        }
    }

    pub fn in_memory(max_entries: u64, default_ttl: Duration) -> Self {
        Self::new(Arc::new(MemoryBackend::new(max_entries)), default_ttl)
    }

    /// Look up a cached payload. Backend errors degrade to a miss.
    pub async fn get(&self, key: &str) -> Option<Value> {
        match self.backend.get(key).await {
            Ok(Some(payload)) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(target: "cache", key, "Cache hit");
                Some(payload)
            }
            Ok(None) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            Err(e) => {
                self.errors.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(target: "cache", key, error = %e, "Cache read failed, treating as miss");
                None
            }
        }
    }

    /// Store a payload under the default TTL. Backend errors are dropped
    /// after logging; the caller's answer is already in hand.
    pub async fn put(&self, key: &str, payload: Value) {
        self.put_with_ttl(key, payload, self.default_ttl).await;
    }

    pub async fn put_with_ttl(&self, key: &str, payload: Value, ttl: Duration) {
        if let Err(e) = self.backend.set(key, payload, ttl).await {
            self.errors.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(target: "cache", key, error = %e, "Cache write failed, skipping");
        }
    }

    pub async fn invalidate(&self, key: &str) -> bool {
        match self.backend.delete(key).await {
            Ok(existed) => existed,
            Err(e) => {
                self.errors.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(target: "cache", key, error = %e, "Cache delete failed");
                false
            }
        }
    }

    /// Drop every entry in a namespace, e.g. after a schema change.
    pub async fn invalidate_namespace(&self, namespace: &str) -> u64 {
        let prefix = format!("{}:", namespace);
        match self.backend.delete_by_prefix(&prefix).await {
            Ok(count) => {
                tracing::info!(target: "cache", namespace, count, "Invalidated namespace");
                count
            }
            Err(e) => {
                self.errors.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(target: "cache", namespace, error = %e, "Namespace invalidation failed");
                0
            }
        }
    }

    /// Shut the backend down. Errors are logged; shutdown proceeds regardless.
    pub async fn close(&self) {
        if let Err(e) = self.backend.close().await {
            tracing::warn!(target: "cache", error = %e, "Cache close failed");
        }
    }

    pub async fn stats(&self) -> CacheStats {
        let (status, entries) = match self.backend.entry_count().await {
            Ok(entries) => (CacheStatus::Connected, entries),
            Err(_) => (CacheStatus::Degraded, 0),
        };
        CacheStats {
            status,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            entries,
        }
    }
}
